mod parser;
mod reader;
mod selector;
mod types;

pub use parser::{LineError, LineParser};
pub use reader::{LogLines, LogReader};
pub use selector::LogSelector;
pub use types::*;
