/// What a round timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Active phase over, the music stops.
    MusicStop,
    /// Seats become claimable.
    ActivateSeats,
    /// Scramble window closed, pick the loser.
    ResolveRound,
    /// Pause after an elimination before moving on.
    Intermission,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    kind: TimerKind,
    remaining_ms: u64,
}

/// Countdown timers registered against the tick clock.
///
/// Timers are owned by the state that scheduled them; `cancel_all` runs on
/// every state exit so none can fire into the next state.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimers {
    pending: Vec<PendingTimer>,
}

impl PhaseTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u64) {
        self.pending.push(PendingTimer {
            kind,
            remaining_ms: delay_ms,
        });
    }

    /// Drop every pending timer. Must run on every state exit.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn remaining_ms(&self, kind: TimerKind) -> Option<u64> {
        self.pending.iter().find(|t| t.kind == kind).map(|t| t.remaining_ms)
    }

    /// Fire timers whose delay is already zero without moving the clock.
    pub fn take_due(&mut self) -> Vec<TimerKind> {
        self.advance(0)
    }

    /// Move the clock forward and return fired timers in scheduling order.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        self.pending.retain_mut(|timer| {
            timer.remaining_ms = timer.remaining_ms.saturating_sub(dt_ms);
            if timer.remaining_ms == 0 {
                fired.push(timer.kind);
                false
            } else {
                true
            }
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_the_delay_elapses() {
        let mut timers = PhaseTimers::new();
        timers.schedule(TimerKind::MusicStop, 40);
        assert!(timers.advance(16).is_empty());
        assert!(timers.advance(16).is_empty());
        assert_eq!(timers.advance(16), vec![TimerKind::MusicStop]);
        assert!(timers.advance(16).is_empty());
    }

    #[test]
    fn zero_delay_fires_without_advancing() {
        let mut timers = PhaseTimers::new();
        timers.schedule(TimerKind::ActivateSeats, 0);
        assert_eq!(timers.take_due(), vec![TimerKind::ActivateSeats]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut timers = PhaseTimers::new();
        timers.schedule(TimerKind::Intermission, 16);
        timers.schedule(TimerKind::ActivateSeats, 0);
        timers.cancel_all();
        assert!(timers.take_due().is_empty());
        assert!(timers.advance(1_000).is_empty());
        assert_eq!(timers.remaining_ms(TimerKind::Intermission), None);
    }

    #[test]
    fn timers_fire_in_scheduling_order() {
        let mut timers = PhaseTimers::new();
        timers.schedule(TimerKind::ResolveRound, 32);
        timers.schedule(TimerKind::ActivateSeats, 16);
        assert_eq!(timers.advance(16), vec![TimerKind::ActivateSeats]);
        assert_eq!(timers.remaining_ms(TimerKind::ResolveRound), Some(16));
        assert_eq!(timers.advance(100), vec![TimerKind::ResolveRound]);
    }
}
