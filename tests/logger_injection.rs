use musical_chairs::adapters::outbound::{init_buffered_logger, init_noop_logger, MultiLogger, OpenFloorPhysics};
use musical_chairs::domains::logger::{DomainLogger, DynLogger};
use musical_chairs::domains::round::{MechanicSchedule, RoundController, RoundSettings};
use musical_chairs::domains::seating::MechanicKind;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl CaptureLogger {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) {
        self.lines.lock().unwrap().push(format!("INFO:{}", msg));
    }
    fn warn(&self, msg: &str) {
        self.lines.lock().unwrap().push(format!("WARN:{}", msg));
    }
    fn error(&self, msg: &str) {
        self.lines.lock().unwrap().push(format!("ERR:{}", msg));
    }
    fn debug(&self, msg: &str) {
        self.lines.lock().unwrap().push(format!("DEBUG:{}", msg));
    }
}

#[tokio::test]
async fn test_buffered_and_noop_logger() {
    let capture = Arc::new(CaptureLogger::default());
    let buffered = init_buffered_logger(capture.clone() as DynLogger, 8);

    buffered.info("one");
    buffered.warn("two");
    buffered.error("three");
    buffered.debug("four");

    tokio::time::sleep(Duration::from_millis(50)).await;

    let lines = capture.lines();
    assert_eq!(lines, vec!["INFO:one", "WARN:two", "ERR:three", "DEBUG:four"]);

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.debug("ignored-debug");
}

#[test]
fn test_multi_logger_fans_out() {
    let first = Arc::new(CaptureLogger::default());
    let second = Arc::new(CaptureLogger::default());
    let multi = MultiLogger::new(vec![first.clone() as DynLogger, second.clone() as DynLogger]);

    multi.warn("seat race");
    assert_eq!(multi.len(), 2);
    assert_eq!(first.lines(), vec!["WARN:seat race"]);
    assert_eq!(second.lines(), vec!["WARN:seat race"]);
}

#[test]
fn test_controller_logs_through_the_injected_logger() {
    let capture = Arc::new(CaptureLogger::default());
    let mut controller = RoundController::new(
        "game-log".to_string(),
        RoundSettings {
            schedule: MechanicSchedule::Fixed(MechanicKind::Static),
            intermission_ms: 0,
            rng_seed: Some(3),
            ..RoundSettings::default()
        },
        Box::new(OpenFloorPhysics),
        capture.clone() as DynLogger,
    )
    .unwrap();

    while !controller.is_over() {
        controller.tick(None).unwrap();
    }

    let lines = capture.lines();
    assert!(lines.iter().any(|l| l.starts_with("INFO:round 1 started: Normal")));
    assert!(lines.iter().any(|l| l == "INFO:round 1: music stopped"));
    assert!(lines.iter().any(|l| l.starts_with("DEBUG:agent-0 sat on seat-0")));
    assert!(lines.iter().any(|l| l.starts_with("INFO:game over: Won")));
}
