use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;

/// The one capability the monitor needs from the outside world for
/// observability: append a timestamped line somewhere.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Console + append-only file sink.
///
/// Every line is prefixed with the current local time and written to both
/// standard output and the log file. If the file cannot be opened the sink
/// degrades to console-only; a monitoring run should not die over a log file.
pub struct DualSink {
    file: Mutex<Option<File>>,
}

impl DualSink {
    /// Open `path` in append mode, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "failed to open log file, continuing console-only"
                );
                None
            }
        };
        Self {
            file: Mutex::new(file),
        }
    }
}

impl LogSink for DualSink {
    fn log(&self, message: &str) {
        let line = format!("{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);

        // The quit watcher holds the terminal in raw mode, where a bare \n
        // does not return the carriage. The file copy gets a plain newline.
        print!("{line}\r\n");
        let _ = std::io::stdout().flush();

        if let Some(file) = self.file.lock().unwrap().as_mut() {
            if let Err(e) = writeln!(file, "{line}") {
                tracing::warn!(error = %e, "failed to append to log file");
            }
        }
    }
}

/// In-memory sink for tests: records raw messages without timestamps.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl LogSink for MemorySink {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}
