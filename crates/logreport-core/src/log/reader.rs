use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub struct LogReader;

impl LogReader {
    /// Open a log file as a stream of text lines
    ///
    /// Files ending in `.gz` are decompressed on the fly; anything else is
    /// read as plain text. The file is closed when the returned iterator is
    /// dropped.
    pub fn open(path: &Path) -> crate::Result<LogLines> {
        tracing::debug!("Opening log file: {}", path.display());

        let file = File::open(path)?;
        let is_gzip = path.extension().is_some_and(|ext| ext == "gz");

        let reader: Box<dyn BufRead> = if is_gzip {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(LogLines::new(reader))
    }
}

/// Lines of a log file, decoded lossily so stray non-UTF-8 bytes do not
/// abort the pass
pub struct LogLines {
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
}

impl LogLines {
    pub fn new(reader: Box<dyn BufRead>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl Iterator for LogLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
