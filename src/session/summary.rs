use serde::{Deserialize, Serialize};

use crate::session::raw::RawSession;

/// Headline numbers for one session, appended to the lifetime performance
/// record when the session completes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub wpm: f64,
    pub accuracy: f64,
}

impl SessionSummary {
    pub fn from_session(session: &RawSession) -> Self {
        Self {
            wpm: wpm(session.correct_count(), session.elapsed_secs()),
            accuracy: accuracy(session.correct_count(), session.attempted_count()),
        }
    }
}

/// Standard words-per-minute: five correct characters count as one word.
fn wpm(correct: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs < 0.1 {
        return 0.0;
    }
    (correct as f64 / 5.0) / (elapsed_secs / 60.0)
}

fn accuracy(correct: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        return 100.0;
    }
    (correct as f64 / attempted as f64 * 100.0).clamp(0.0, 100.0)
}
