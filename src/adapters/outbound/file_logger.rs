use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Initialize fast_log at `path` and return the injectable logger writing into it.
///
/// fast_log can only be initialized once per process; a second call fails.
pub fn init_file_logger(path: &str, level: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, FileLogger::parse_level(level))
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
