use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::targeting::targeted_patterns;
use crate::generator::dictionary::Dictionary;
use crate::history::TimingHistory;
use crate::session::raw::RawSession;

/// Produces each session's word batch, biased toward the user's weak
/// patterns. Holds its own rng so batch generation stays deterministic under
/// a fixed seed.
pub struct WordGenerator {
    rng: SmallRng,
}

impl WordGenerator {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate exactly `count` distinct words (capped at the dictionary
    /// size, which also keeps the random fallback loop finite).
    ///
    /// Until the first session completes there is nothing to bias on, so the
    /// batch is a uniform random draw. After that, every dictionary word is
    /// weighted, targeted words are seeded into the batch first, the rest is
    /// filled from the weight ranking, and the final batch is shuffled so
    /// word order carries no difficulty signal.
    pub fn next_batch(
        &mut self,
        count: usize,
        dictionary: &Dictionary,
        history: &TimingHistory,
        session: &RawSession,
    ) -> Vec<String> {
        let count = count.min(dictionary.len());
        if count == 0 {
            return Vec::new();
        }

        if !history.has_completed_sessions() {
            let mut batch = Vec::with_capacity(count);
            self.fill_random(&mut batch, count, dictionary);
            self.shuffle(&mut batch);
            return batch;
        }

        let mut ranked: Vec<(&String, f64)> = dictionary
            .words()
            .iter()
            .map(|word| (word, word_weight(word, history, session)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut batch: Vec<String> = Vec::with_capacity(count);
        let mut taken: HashSet<String> = HashSet::new();

        for word in targeted_patterns(history).words {
            if batch.len() == count {
                break;
            }
            if dictionary.contains(&word) && !taken.contains(word.as_str()) {
                taken.insert(word.clone());
                batch.push(word);
            }
        }

        for (word, _) in &ranked {
            if batch.len() == count {
                break;
            }
            if !taken.contains(word.as_str()) {
                taken.insert((*word).clone());
                batch.push((*word).clone());
            }
        }

        // Exhausted ranking (only possible if count exceeds what the scan
        // could supply): fall back to random draws.
        self.fill_random(&mut batch, count, dictionary);

        self.shuffle(&mut batch);
        batch
    }

    fn fill_random(&mut self, batch: &mut Vec<String>, count: usize, dictionary: &Dictionary) {
        while batch.len() < count {
            let pick = &dictionary.words()[self.rng.gen_range(0..dictionary.len())];
            if !batch.contains(pick) {
                batch.push(pick.clone());
            }
        }
    }

    /// In-place Fisher-Yates.
    fn shuffle(&mut self, words: &mut [String]) {
        for i in (1..words.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            words.swap(i, j);
        }
    }
}

impl Default for WordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Selection weight for one dictionary word.
///
/// Base 1.0, plus the word's historical average over 1000, plus each
/// letter's historical average over 2000 and each bigram's over 4000. A word
/// mistyped this session is penalized twice: once scaled by the miss count
/// (when the word has a completed attempt this session) and once as a flat
/// doubling. The two applications compound.
pub fn word_weight(word: &str, history: &TimingHistory, session: &RawSession) -> f64 {
    let mut weight = 1.0;

    if let Some(avg) = history.word_average(word) {
        weight += avg / 1000.0;
    }

    let mistypes = session.word_mistypes.get(word).copied().unwrap_or(0);
    if mistypes > 0 && session.word_timings.contains_key(word) {
        weight *= 1.0 + mistypes as f64;
    }
    if mistypes > 0 {
        weight *= 2.0;
    }

    for ch in word.chars() {
        if let Some(avg) = history.letter_average(ch) {
            weight += avg / 2000.0;
        }
    }

    let chars: Vec<char> = word.chars().collect();
    for pair in chars.windows(2) {
        let bigram: String = pair.iter().collect();
        if let Some(avg) = history.bigram_average(&bigram) {
            weight += avg / 4000.0;
        }
    }

    weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(words: &[&str]) -> Dictionary {
        Dictionary::from_words(words.iter().map(|s| s.to_string()).collect())
    }

    fn history_with_session() -> TimingHistory {
        let mut history = TimingHistory::default();
        history.historical_performance.push(crate::history::PerformanceRecord {
            wpm: 40.0,
            accuracy: 95.0,
            timestamp: chrono::Utc::now(),
        });
        history
    }

    #[test]
    fn cold_start_is_a_permutation_of_the_dictionary() {
        let dictionary = dict(&["cat", "dog", "bird"]);
        let mut generator = WordGenerator::with_seed(7);

        let batch = generator.next_batch(
            3,
            &dictionary,
            &TimingHistory::default(),
            &RawSession::default(),
        );

        let mut sorted = batch.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["bird", "cat", "dog"]);
    }

    #[test]
    fn batch_words_are_distinct() {
        let dictionary = dict(&["one", "two", "three", "four", "five", "six"]);
        let mut generator = WordGenerator::with_seed(3);

        let batch = generator.next_batch(
            5,
            &dictionary,
            &TimingHistory::default(),
            &RawSession::default(),
        );

        let distinct: HashSet<&String> = batch.iter().collect();
        assert_eq!(batch.len(), 5);
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn count_is_capped_at_dictionary_size() {
        let dictionary = dict(&["cat", "dog"]);
        let mut generator = WordGenerator::with_seed(1);

        let batch = generator.next_batch(
            50,
            &dictionary,
            &TimingHistory::default(),
            &RawSession::default(),
        );
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn targeted_words_always_make_the_batch() {
        let dictionary = dict(&["aaa", "bbb", "ccc", "ddd", "eee", "cat"]);
        let mut history = history_with_session();
        history
            .historical_words
            .insert("cat".to_string(), vec![500.0, 600.0]);
        history.word_mistypes.insert("cat".to_string(), 2);

        let mut generator = WordGenerator::with_seed(11);
        let batch = generator.next_batch(3, &dictionary, &history, &RawSession::default());

        assert!(batch.contains(&"cat".to_string()));
    }

    #[test]
    fn targeted_words_missing_from_dictionary_are_skipped() {
        let dictionary = dict(&["aaa", "bbb"]);
        let mut history = history_with_session();
        history
            .historical_words
            .insert("zebra".to_string(), vec![900.0]);
        history.word_mistypes.insert("zebra".to_string(), 5);

        let mut generator = WordGenerator::with_seed(2);
        let batch = generator.next_batch(2, &dictionary, &history, &RawSession::default());

        assert!(!batch.contains(&"zebra".to_string()));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn historical_word_time_raises_weight() {
        let mut history = history_with_session();
        history
            .historical_words
            .insert("cat".to_string(), vec![2000.0]);

        let session = RawSession::default();
        let weighted = word_weight("cat", &history, &session);
        let plain = word_weight("dog", &history, &session);
        assert_eq!(weighted - plain, 2.0); // 2000 / 1000
    }

    #[test]
    fn session_mistypes_double_penalize() {
        let history = history_with_session();
        let mut session = RawSession::default();
        session.word_mistypes.insert("cat".to_string(), 3);
        session.word_timings.insert("cat".to_string(), vec![200.0]);

        // (1 + 3) for the miss count, times the flat doubling
        let weighted = word_weight("cat", &history, &session);
        let plain = word_weight("dog", &history, &session);
        assert_eq!(weighted / plain, 8.0);
    }

    #[test]
    fn mistypes_without_a_completed_attempt_only_double() {
        let history = history_with_session();
        let mut session = RawSession::default();
        session.word_mistypes.insert("cat".to_string(), 3);

        let weighted = word_weight("cat", &history, &session);
        let plain = word_weight("dog", &history, &session);
        assert_eq!(weighted / plain, 2.0);
    }

    #[test]
    fn letter_and_bigram_history_contribute() {
        let mut history = history_with_session();
        history.historical_letters.insert('c', vec![400.0]);
        history
            .historical_bigrams
            .insert("ca".to_string(), vec![800.0]);

        let session = RawSession::default();
        let weight = word_weight("ca", &history, &session);
        // 1.0 base + 400/2000 + 800/4000
        assert!((weight - 1.4).abs() < 1e-9);
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut generator = WordGenerator::with_seed(42);
        let mut batch: Vec<String> = ["cat", "dog", "bird", "fish", "newt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut expected = batch.clone();

        generator.shuffle(&mut batch);

        let mut shuffled = batch.clone();
        shuffled.sort();
        expected.sort();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn heaviest_words_fill_the_batch_after_targets() {
        let dictionary = dict(&["slow", "fast", "calm"]);
        let mut history = history_with_session();
        history
            .historical_words
            .insert("slow".to_string(), vec![5000.0]);

        let mut generator = WordGenerator::with_seed(9);
        let batch = generator.next_batch(2, &dictionary, &history, &RawSession::default());

        // "slow" is targeted (only word with history) and also heaviest
        assert!(batch.contains(&"slow".to_string()));
    }
}
