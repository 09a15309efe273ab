use std::collections::HashSet;

pub const DEFAULT_MIN_WORD_LEN: usize = 3;

const WORDS_EN: &str = include_str!("../../assets/words-en.json");

/// Read-only practice word pool. Deduplicated on load; order is preserved so
/// selection stays deterministic for a given seed.
pub struct Dictionary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Dictionary {
    pub fn load(min_word_len: usize) -> Self {
        let words: Vec<String> = serde_json::from_str(WORDS_EN).unwrap_or_default();
        Self::from_words(
            words
                .into_iter()
                .filter(|w| w.len() >= min_word_len && w.chars().all(|c| c.is_ascii_lowercase()))
                .collect(),
        )
    }

    /// Build from an explicit word list, dropping duplicates.
    pub fn from_words(words: Vec<String>) -> Self {
        let mut index = HashSet::new();
        let words: Vec<String> = words
            .into_iter()
            .filter(|w| index.insert(w.clone()))
            .collect();
        Self { words, index }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
