use crate::domains::logger::DomainLogger;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

struct LogLine {
    level: Level,
    msg: String,
}

struct BufferedLogger {
    sender: mpsc::Sender<LogLine>,
}

impl BufferedLogger {
    /// Never blocks the tick loop. A full buffer drops the line.
    fn push(&self, level: Level, msg: &str) {
        let _ = self.sender.try_send(LogLine {
            level,
            msg: msg.to_string(),
        });
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }
}

/// Logger that hands lines to `sink` from a background task.
///
/// Must be called inside a tokio runtime. `capacity` bounds the channel.
pub fn init_buffered_logger(sink: Arc<dyn DomainLogger>, capacity: usize) -> Arc<dyn DomainLogger> {
    let (tx, mut rx) = mpsc::channel::<LogLine>(capacity.max(1));

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            match line.level {
                Level::Debug => sink.debug(&line.msg),
                Level::Info => sink.info(&line.msg),
                Level::Warn => sink.warn(&line.msg),
                Level::Error => sink.error(&line.msg),
            }
        }
    });

    Arc::new(BufferedLogger { sender: tx })
}
