use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

/// Opens the debug log in append mode. The terminal belongs to the UI, so
/// every diagnostic goes to this file instead.
pub fn init(path: &Path) {
    let mut logger = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    if logger.is_none()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(path)
    {
        *logger = Some(file);
    }
}

pub fn log(message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap_or_else(|e| e.into_inner()).as_mut() {
        let timestamp = chrono::Utc::now().timestamp();
        let _ = writeln!(logger, "[{}] {}", timestamp, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_without_init_is_noop() {
        log("dropped silently");
    }

    #[test]
    fn test_logger_init_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        init(&path);
        log("Test log message");
    }
}
