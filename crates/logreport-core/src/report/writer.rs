use crate::analysis::ReportRow;
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Marker in the template replaced by the JSON rows
pub const TABLE_MARKER: &str = "$table_json";

/// Renders report rows into an HTML template
pub struct ReportWriter {
    template: PathBuf,
}

impl ReportWriter {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render `rows` into the template and write the result to `output`
    ///
    /// The report is written to a temporary file next to `output` and moved
    /// into place only once complete, so a failed write never leaves a
    /// truncated report behind. Missing parent directories are created.
    pub fn write(&self, rows: &[ReportRow], output: &Path) -> Result<PathBuf> {
        tracing::debug!(
            "Rendering {} rows from {} into {}",
            rows.len(),
            self.template.display(),
            output.display()
        );

        let table_json = serde_json::to_string(rows)?;

        let report_dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&report_dir).map_err(|e| report_error(output, e))?;

        let template =
            File::open(&self.template).map_err(|e| report_error(&self.template, e))?;

        let mut tmp =
            NamedTempFile::new_in(&report_dir).map_err(|e| report_error(output, e))?;
        render(BufReader::new(template), tmp.as_file_mut(), &table_json)
            .map_err(|e| report_error(output, e))?;

        // On failure the temporary file is dropped, which deletes it
        tmp.persist(output).map_err(|e| report_error(output, e.error))?;

        tracing::info!(
            "Successfully wrote report with {} rows to {}",
            rows.len(),
            output.display()
        );

        Ok(output.to_path_buf())
    }
}

/// Copy the template line by line, substituting every marker occurrence
fn render<R: BufRead, W: Write>(mut template: R, out: W, table_json: &str) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    let mut line = Vec::new();
    loop {
        line.clear();
        if template.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = std::str::from_utf8(&line).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("template is not valid UTF-8: {}", e),
            )
        })?;
        out.write_all(text.replace(TABLE_MARKER, table_json).as_bytes())?;
    }
    out.flush()
}

fn report_error(path: &Path, source: io::Error) -> Error {
    Error::Report {
        path: path.display().to_string(),
        source,
    }
}
