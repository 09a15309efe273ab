use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::mean;
use crate::session::raw::RawSession;
use crate::session::summary::SessionSummary;

/// One completed session, as it appears in the lifetime record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub wpm: f64,
    pub accuracy: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Lifetime typing record for one user. Read at session start to drive word
/// selection and targeting, appended to exactly once when a session
/// completes, never mutated mid-session. The persistence layer owns the
/// serialized copy; this type never performs I/O.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingHistory {
    /// All recorded latencies per letter, across every completed session.
    pub historical_letters: HashMap<char, Vec<f64>>,
    /// All recorded latencies per adjacent character pair.
    pub historical_bigrams: HashMap<String, Vec<f64>>,
    /// All normalized per-attempt completion times per word.
    pub historical_words: HashMap<String, Vec<f64>>,
    /// Cumulative mistake count per word across all sessions.
    pub word_mistypes: HashMap<String, u32>,
    /// One entry per completed session, in chronological order.
    pub historical_performance: Vec<PerformanceRecord>,
    /// Most recent session's average latency per letter.
    pub letters: HashMap<char, f64>,
    /// Most recent session's average latency per bigram.
    pub bigrams: HashMap<String, f64>,
    /// Most recent session's average normalized time per word.
    pub words: HashMap<String, f64>,
}

impl TimingHistory {
    pub fn has_completed_sessions(&self) -> bool {
        !self.historical_performance.is_empty()
    }

    /// Lifetime average latency for a letter. Keys with no recorded timings
    /// are treated as absent.
    pub fn letter_average(&self, letter: char) -> Option<f64> {
        self.historical_letters.get(&letter).and_then(|v| mean(v))
    }

    pub fn bigram_average(&self, bigram: &str) -> Option<f64> {
        self.historical_bigrams.get(bigram).and_then(|v| mean(v))
    }

    pub fn word_average(&self, word: &str) -> Option<f64> {
        self.historical_words.get(word).and_then(|v| mean(v))
    }

    /// Absorb one completed session: append its timing batches, accumulate
    /// its mistypes, push its performance record, and refresh the
    /// latest-session average caches. The one write point in the lifecycle.
    pub fn merge_session(&mut self, session: &RawSession, summary: &SessionSummary) {
        for (&letter, times) in &session.letter_timings {
            if times.is_empty() {
                continue;
            }
            self.historical_letters
                .entry(letter)
                .or_default()
                .extend_from_slice(times);
        }
        for (bigram, times) in &session.bigram_timings {
            if times.is_empty() {
                continue;
            }
            self.historical_bigrams
                .entry(bigram.clone())
                .or_default()
                .extend_from_slice(times);
        }
        for (word, times) in &session.word_timings {
            if times.is_empty() {
                continue;
            }
            self.historical_words
                .entry(word.clone())
                .or_default()
                .extend_from_slice(times);
        }
        for (word, &count) in &session.word_mistypes {
            *self.word_mistypes.entry(word.clone()).or_insert(0) += count;
        }

        self.historical_performance.push(PerformanceRecord {
            wpm: summary.wpm,
            accuracy: summary.accuracy,
            timestamp: Utc::now(),
        });

        self.letters = session
            .letter_timings
            .iter()
            .filter_map(|(&ch, v)| mean(v).map(|avg| (ch, avg)))
            .collect();
        self.bigrams = session
            .bigram_timings
            .iter()
            .filter_map(|(k, v)| mean(v).map(|avg| (k.clone(), avg)))
            .collect();
        self.words = session
            .word_timings
            .iter()
            .filter_map(|(k, v)| mean(v).map(|avg| (k.clone(), avg)))
            .collect();
    }

    /// User-initiated "delete data": reset to the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
