use std::collections::HashMap;

use crate::history::TimingHistory;

#[derive(Clone, Debug, PartialEq)]
pub struct WordStat {
    pub word: String,
    /// Average normalized completion time, rounded to the nearest ms.
    pub average_ms: f64,
    pub occurrences: usize,
    pub mistypes: u32,
}

/// One entry per word in the supplied list, duplicates included, most
/// mistyped first with slower words breaking ties. Words with no recorded
/// attempts get an average of 0, never NaN.
pub fn word_stats(
    words: &[String],
    word_timings: &HashMap<String, Vec<f64>>,
    word_mistypes: &HashMap<String, u32>,
) -> Vec<WordStat> {
    let mut stats: Vec<WordStat> = words
        .iter()
        .map(|word| make_stat(word, word_timings.get(word), word_mistypes))
        .collect();
    sort_worst_first(&mut stats);
    stats
}

/// Lifetime view: for words history has attempts for, the historical average
/// and the lifetime mistype count win; words only attempted this session
/// keep their session values. The key set is the union of both sources.
/// Before the session has been absorbed into history, session stats pass
/// through unmodified.
pub fn overall_word_stats(
    session_stats: &[WordStat],
    history: &TimingHistory,
    session_absorbed: bool,
) -> Vec<WordStat> {
    if !session_absorbed {
        return session_stats.to_vec();
    }

    let mut merged: HashMap<String, WordStat> = session_stats
        .iter()
        .map(|s| (s.word.clone(), s.clone()))
        .collect();
    for (word, times) in &history.historical_words {
        if times.is_empty() {
            continue;
        }
        merged.insert(
            word.clone(),
            make_stat(word, Some(times), &history.word_mistypes),
        );
    }

    let mut stats: Vec<WordStat> = merged.into_values().collect();
    sort_worst_first(&mut stats);
    stats
}

fn make_stat(word: &str, times: Option<&Vec<f64>>, mistypes: &HashMap<String, u32>) -> WordStat {
    let (average_ms, occurrences) = match times {
        Some(t) if !t.is_empty() => {
            ((t.iter().sum::<f64>() / t.len() as f64).round(), t.len())
        }
        _ => (0.0, 0),
    };
    WordStat {
        word: word.to_string(),
        average_ms,
        occurrences,
        mistypes: mistypes.get(word).copied().unwrap_or(0),
    }
}

fn sort_worst_first(stats: &mut [WordStat]) {
    stats.sort_by(|a, b| {
        b.mistypes
            .cmp(&a.mistypes)
            .then(
                b.average_ms
                    .partial_cmp(&a.average_ms)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(a.word.cmp(&b.word))
    });
}
