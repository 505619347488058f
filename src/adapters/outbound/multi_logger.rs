use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans every line out to several loggers in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }

    fn debug(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.debug(msg));
    }
}

/// File and console together, console only when the file cannot be opened.
pub fn init_combined_logger(path: &str, level: &str, verbose: bool) -> DynLogger {
    let console = if verbose {
        super::console_logger::init_verbose_console_logger()
    } else {
        super::console_logger::init_console_logger()
    };
    match super::file_logger::init_file_logger(path, level) {
        Ok(file) => Arc::new(MultiLogger::new(vec![file, console])),
        Err(e) => {
            tracing::warn!("falling back to console logging: {}", e);
            console
        }
    }
}
