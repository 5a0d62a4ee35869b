use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use quiz_core::model::ModeConfig;

//
// ─── TIMER STATE MACHINE ───────────────────────────────────────────────────────
//

/// One countdown transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting; the new remaining-seconds value.
    Running(u32),
    /// The tick that reached zero. Emitted exactly once; the session must
    /// finish now.
    Expired,
    /// The timer was stopped (manual finish or navigation away) or had
    /// already expired; nothing more will happen.
    Stopped,
}

/// Exam-mode countdown.
///
/// Pure state machine, decremented once per elapsed second by whoever drives
/// it. It runs independently of navigation and answering: nothing pauses or
/// resets it, and an in-flight answer submission does not block a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamTimer {
    remaining: u32,
    expired: bool,
    stopped: bool,
}

impl ExamTimer {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            expired: false,
            stopped: false,
        }
    }

    /// Build a timer for a mode, `None` for untimed modes.
    #[must_use]
    pub fn from_config(config: &ModeConfig) -> Option<Self> {
        config.time_limit().map(Self::new)
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.expired && !self.stopped
    }

    /// Halt the countdown. Entering the finished state manually wins the
    /// race against expiry; later ticks are `Stopped` no-ops.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Advance the countdown by one elapsed second.
    pub fn tick(&mut self) -> TimerTick {
        if self.stopped || self.expired {
            return TimerTick::Stopped;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining)
        }
    }
}

//
// ─── WALL-CLOCK DRIVER ─────────────────────────────────────────────────────────
//

/// Drive a shared timer at one tick per second, forwarding each transition
/// to the embedding view.
///
/// Returns after forwarding `Expired`, when the timer is stopped from the
/// outside, or when the receiver is dropped. Dropping the receiving view is
/// the implicit cancellation of the countdown.
pub async fn drive(timer: Arc<Mutex<ExamTimer>>, ticks: mpsc::UnboundedSender<TimerTick>) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // the first interval tick completes immediately; skip it so the first
    // decrement lands after one full second
    interval.tick().await;

    loop {
        interval.tick().await;

        let tick = match timer.lock() {
            Ok(mut timer) => timer.tick(),
            Err(_) => return,
        };

        match tick {
            TimerTick::Running(_) => {
                if ticks.send(tick).is_err() {
                    if let Ok(mut timer) = timer.lock() {
                        timer.stop();
                    }
                    return;
                }
            }
            TimerTick::Expired => {
                let _ = ticks.send(tick);
                return;
            }
            TimerTick::Stopped => return,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
