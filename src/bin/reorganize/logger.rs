use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use audiobook_tools::moves::MoveLog;

/// Console logger with an optional buffered file mirror.
///
/// Info lines go to stdout, warnings and errors colored to stderr, and debug
/// detail only when verbose. When a log file is given, every emitted line is
/// also written there with a timestamp and level prefix.
pub struct RunLog {
    verbose: bool,
    writer: Option<BufWriter<File>>,
}

impl RunLog {
    /// Create a logger, opening the log file in append mode when given.
    pub fn new(verbose: bool, log_file: Option<&Path>) -> Result<Self> {
        let writer = match log_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };
        Ok(Self { verbose, writer })
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn write_file(&mut self, level: &str, message: &str) {
        if let Some(ref mut writer) = self.writer {
            let _ = writeln!(writer, "[{}] {level}: {message}", Self::timestamp());
            let _ = writer.flush();
        }
    }
}

impl MoveLog for RunLog {
    fn info(&mut self, message: &str) {
        println!("{message}");
        self.write_file("INFO", message);
    }

    fn warn(&mut self, message: &str) {
        audiobook_tools::print_warning(message);
        self.write_file("WARNING", message);
    }

    fn error(&mut self, message: &str) {
        audiobook_tools::print_error(message);
        self.write_file("ERROR", message);
    }

    fn debug(&mut self, message: &str) {
        if self.verbose {
            println!("{message}");
            self.write_file("DEBUG", message);
        }
    }
}
