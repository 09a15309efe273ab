use std::collections::HashMap;

/// Ephemeral per-session typing record, owned by whatever drives the input
/// loop. The stats and generation functions only ever read it; the one
/// mutation path is `record`.
///
/// Timing invariant: a latency is appended only for a keystroke whose typed
/// character exactly matches the target at the cursor. Mismatches increment
/// the current word's mistype count and record no timing. Because `record`
/// appends the timing and the correctness event together, the positional
/// correlation the aggregators rely on (Nth correct occurrence consumes the
/// Nth recorded latency) cannot desynchronize.
#[derive(Clone, Debug, Default)]
pub struct RawSession {
    /// Target words for this session, in order.
    pub words: Vec<String>,
    /// Index of the word currently being typed.
    pub word_index: usize,
    /// Finished inputs, one per completed word, in order.
    pub completed_inputs: Vec<String>,
    /// In-progress input for `words[word_index]`.
    pub current_input: String,
    /// Inter-keystroke latencies per letter, recorded on correct keystrokes.
    pub letter_timings: HashMap<char, Vec<f64>>,
    /// Latency of the second character of each correctly-typed adjacent pair.
    pub bigram_timings: HashMap<String, Vec<f64>>,
    /// Normalized per-attempt completion times (total ms / word length).
    pub word_timings: HashMap<String, Vec<f64>>,
    /// Mistake count (wrong or skipped characters) per word.
    pub word_mistypes: HashMap<String, u32>,

    word_elapsed_ms: f64,
    correct: usize,
    attempted: usize,
    elapsed_ms: f64,
}

impl RawSession {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.word_index >= self.words.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    pub fn attempted_count(&self) -> usize {
        self.attempted
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }

    /// Feed one keystroke with the latency since the previous one.
    ///
    /// Space submits the current word (characters never typed count as
    /// skipped mistakes). Any other character is matched against the target
    /// at the cursor. The last word submits itself once its full length has
    /// been typed, so a session needs no trailing space.
    pub fn record(&mut self, typed: char, latency_ms: f64) {
        if self.is_complete() {
            return;
        }

        if typed == ' ' {
            self.finish_word();
            return;
        }

        let target_word = self.words[self.word_index].clone();
        let pos = self.current_input.chars().count();
        let target_char = target_word.chars().nth(pos);

        self.attempted += 1;
        self.elapsed_ms += latency_ms;
        self.word_elapsed_ms += latency_ms;

        match target_char {
            Some(expected) if expected == typed => {
                self.correct += 1;
                self.letter_timings
                    .entry(expected)
                    .or_default()
                    .push(latency_ms);
                if pos > 0 && self.prev_char_correct(&target_word, pos) {
                    let prev = target_word.chars().nth(pos - 1).unwrap_or_default();
                    let pair: String = [prev, expected].iter().collect();
                    self.bigram_timings.entry(pair).or_default().push(latency_ms);
                }
            }
            _ => {
                *self
                    .word_mistypes
                    .entry(target_word.clone())
                    .or_insert(0) += 1;
            }
        }

        self.current_input.push(typed);

        let at_last_word = self.word_index + 1 == self.words.len();
        if at_last_word && self.current_input.chars().count() >= target_word.chars().count() {
            self.finish_word();
        }
    }

    fn prev_char_correct(&self, target_word: &str, pos: usize) -> bool {
        let typed_prev = self.current_input.chars().nth(pos - 1);
        let target_prev = target_word.chars().nth(pos - 1);
        typed_prev.is_some() && typed_prev == target_prev
    }

    fn finish_word(&mut self) {
        let word = self.words[self.word_index].clone();
        let word_len = word.chars().count();
        let typed_len = self.current_input.chars().count();

        let skipped = word_len.saturating_sub(typed_len);
        if skipped > 0 {
            *self.word_mistypes.entry(word.clone()).or_insert(0) += skipped as u32;
            self.attempted += skipped;
        }

        if word_len > 0 {
            self.word_timings
                .entry(word)
                .or_default()
                .push(self.word_elapsed_ms / word_len as f64);
        }

        self.completed_inputs
            .push(std::mem::take(&mut self.current_input));
        self.word_index += 1;
        self.word_elapsed_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_word(session: &mut RawSession, text: &str, latency_ms: f64) {
        for ch in text.chars() {
            session.record(ch, latency_ms);
        }
        if !session.is_complete() && !session.current_input.is_empty() {
            session.record(' ', 0.0);
        }
    }

    #[test]
    fn correct_keystrokes_record_letter_timings() {
        let mut session = RawSession::new(vec!["cat".to_string()]);
        session.record('c', 100.0);
        session.record('a', 200.0);
        session.record('t', 150.0);

        assert_eq!(session.letter_timings[&'c'], vec![100.0]);
        assert_eq!(session.letter_timings[&'a'], vec![200.0]);
        assert_eq!(session.letter_timings[&'t'], vec![150.0]);
        assert!(session.word_mistypes.is_empty());
    }

    #[test]
    fn mistypes_record_no_timing() {
        let mut session = RawSession::new(vec!["cat".to_string(), "dog".to_string()]);
        session.record('x', 100.0);
        session.record(' ', 0.0);

        assert!(session.letter_timings.is_empty());
        // 1 wrong character + 2 skipped
        assert_eq!(session.word_mistypes["cat"], 3);
    }

    #[test]
    fn bigram_requires_both_characters_correct() {
        let mut session = RawSession::new(vec!["cat".to_string()]);
        session.record('c', 100.0);
        session.record('x', 50.0); // wrong 'a'
        session.record('t', 150.0); // correct but follows a mistype

        assert!(session.bigram_timings.is_empty());

        let mut clean = RawSession::new(vec!["cat".to_string()]);
        clean.record('c', 100.0);
        clean.record('a', 120.0);
        clean.record('t', 130.0);
        assert_eq!(clean.bigram_timings["ca"], vec![120.0]);
        assert_eq!(clean.bigram_timings["at"], vec![130.0]);
    }

    #[test]
    fn word_timing_is_normalized_by_length() {
        let mut session = RawSession::new(vec!["cat".to_string()]);
        type_word(&mut session, "cat", 100.0);

        // 300ms total over 3 characters
        assert_eq!(session.word_timings["cat"], vec![100.0]);
        assert!(session.is_complete());
    }

    #[test]
    fn last_word_completes_without_trailing_space() {
        let mut session = RawSession::new(vec!["cat".to_string(), "dog".to_string()]);
        type_word(&mut session, "cat", 100.0);
        assert!(!session.is_complete());
        for ch in "dog".chars() {
            session.record(ch, 100.0);
        }
        assert!(session.is_complete());
        assert_eq!(session.completed_inputs, vec!["cat", "dog"]);
    }

    #[test]
    fn keystrokes_after_completion_are_ignored() {
        let mut session = RawSession::new(vec!["cat".to_string()]);
        type_word(&mut session, "cat", 100.0);
        session.record('z', 100.0);

        assert_eq!(session.attempted_count(), 3);
        assert!(session.word_mistypes.is_empty());
    }

    #[test]
    fn repeated_word_accumulates_attempts() {
        let mut session = RawSession::new(vec!["the".to_string(), "the".to_string()]);
        type_word(&mut session, "the", 100.0);
        type_word(&mut session, "the", 200.0);

        assert_eq!(session.word_timings["the"], vec![100.0, 200.0]);
        assert_eq!(session.letter_timings[&'t'], vec![100.0, 200.0]);
    }
}
