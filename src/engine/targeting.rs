use crate::engine::mean;
use crate::history::TimingHistory;

/// How many of each pattern category get targeted.
pub const TARGET_COUNT: usize = 5;

/// The user's worst-performing patterns, used for highlighting and to seed
/// the next word batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetedPatterns {
    pub letters: Vec<char>,
    pub bigrams: Vec<String>,
    pub words: Vec<String>,
}

/// Derive the weak-pattern sets from lifetime history: letters and bigrams
/// by slowest historical mean, words by lifetime mistypes with average time
/// breaking ties. Categories with no history come back empty.
pub fn targeted_patterns(history: &TimingHistory) -> TargetedPatterns {
    let mut letters: Vec<(char, f64)> = history
        .historical_letters
        .iter()
        .filter_map(|(&letter, times)| mean(times).map(|avg| (letter, avg)))
        .collect();
    letters.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    letters.truncate(TARGET_COUNT);

    let mut bigrams: Vec<(String, f64)> = history
        .historical_bigrams
        .iter()
        .filter_map(|(bigram, times)| mean(times).map(|avg| (bigram.clone(), avg)))
        .collect();
    bigrams.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    bigrams.truncate(TARGET_COUNT);

    let mut word_entries: Vec<(String, f64, u32)> = history
        .historical_words
        .keys()
        .map(|word| {
            let avg = history.word_average(word).unwrap_or(0.0);
            let mistypes = history.word_mistypes.get(word).copied().unwrap_or(0);
            (word.clone(), avg, mistypes)
        })
        .collect();
    word_entries.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then(b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
            .then(a.0.cmp(&b.0))
    });
    word_entries.truncate(TARGET_COUNT);

    TargetedPatterns {
        letters: letters.into_iter().map(|(letter, _)| letter).collect(),
        bigrams: bigrams.into_iter().map(|(bigram, _)| bigram).collect(),
        words: word_entries.into_iter().map(|(word, _, _)| word).collect(),
    }
}
