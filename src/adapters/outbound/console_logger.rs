use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Plain stdout/stderr logger. `verbose` also echoes per-tick debug lines.
struct ConsoleBridge {
    verbose: bool,
}

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) {
        println!("[game] {}", msg);
    }

    fn warn(&self, msg: &str) {
        println!("[game] WARN: {}", msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("[game] ERROR: {}", msg);
    }

    fn debug(&self, msg: &str) {
        if self.verbose {
            println!("[game] debug: {}", msg);
        }
    }
}

/// Console-backed DomainLogger, also the fallback when the file logger fails.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge { verbose: false })
}

pub fn init_verbose_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge { verbose: true })
}
