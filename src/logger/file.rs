/// Append-only log file output
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "poolcandles.log";

static LOG_FILE: Lazy<Mutex<Option<BufWriter<File>>>> = Lazy::new(|| Mutex::new(None));

/// Open the log file under the default log directory
pub fn init_file_logging() {
    if let Err(e) = init_file_logging_in(Path::new(LOG_DIR)) {
        eprintln!("Failed to initialize file logging: {}", e);
    }
}

pub fn init_file_logging_in(dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    *LOG_FILE.lock() = Some(BufWriter::new(file));
    Ok(path)
}

/// Write one line to the log file; a no-op until file logging is initialized
pub fn write_to_file(line: &str) {
    let mut guard = LOG_FILE.lock();
    if let Some(writer) = guard.as_mut() {
        if writeln!(writer, "{}", line).is_err() {
            // Disk full or file removed, stop trying
            *guard = None;
        }
    }
}

pub fn flush_file_logging() {
    if let Some(writer) = LOG_FILE.lock().as_mut() {
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_file_logging_in(dir.path()).unwrap();

        write_to_file("first line");
        write_to_file("second line");
        flush_file_logging();

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("first line\n"));
        assert!(contents.contains("second line\n"));
    }
}
