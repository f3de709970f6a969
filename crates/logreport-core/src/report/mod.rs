mod writer;

pub use writer::{ReportWriter, TABLE_MARKER};
