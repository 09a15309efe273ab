use std::collections::HashMap;

use crate::history::TimingHistory;

#[derive(Clone, Debug, PartialEq)]
pub struct LetterStat {
    pub letter: char,
    pub average_ms: f64,
    pub occurrences: usize,
}

/// Per-letter averages for the session so far, slowest first.
///
/// Correctness events and timings are correlated positionally: the Nth
/// correct occurrence of a letter (scanning completed inputs in order, then
/// the in-progress input) consumes the Nth recorded latency for that letter.
/// Every correct occurrence advances the letter's cursor whether or not a
/// latency exists to consume; occurrences are only counted where one does.
/// Letters never correctly typed are omitted entirely.
pub fn letter_stats(
    words: &[String],
    word_index: usize,
    completed_inputs: &[String],
    current_input: &str,
    letter_timings: &HashMap<char, Vec<f64>>,
) -> Vec<LetterStat> {
    let mut cursors: HashMap<char, usize> = HashMap::new();
    let mut sums: HashMap<char, (f64, usize)> = HashMap::new();

    for (i, target) in words.iter().enumerate() {
        let typed = match completed_inputs.get(i) {
            Some(input) => input.as_str(),
            None if i == word_index => current_input,
            None => break,
        };
        for (expected, actual) in target.chars().zip(typed.chars()) {
            if expected != actual {
                continue;
            }
            let cursor = cursors.entry(expected).or_insert(0);
            if let Some(&ms) = letter_timings.get(&expected).and_then(|v| v.get(*cursor)) {
                let entry = sums.entry(expected).or_insert((0.0, 0));
                entry.0 += ms;
                entry.1 += 1;
            }
            *cursor += 1;
        }
    }

    let mut stats: Vec<LetterStat> = sums
        .into_iter()
        .map(|(letter, (sum, count))| LetterStat {
            letter,
            average_ms: sum / count as f64,
            occurrences: count,
        })
        .collect();
    sort_slowest_first(&mut stats);
    stats
}

/// Session stats merged with lifetime history. For keys history has timings
/// for, the historical average wins (history already includes this session
/// once it has been merged, so reusing the session value would double
/// count); keys only seen this session keep their session value. Before the
/// session has been absorbed into history, the session stats are returned
/// unmodified.
pub fn overall_letter_stats(
    session_stats: &[LetterStat],
    history: &TimingHistory,
    session_absorbed: bool,
) -> Vec<LetterStat> {
    if !session_absorbed {
        return session_stats.to_vec();
    }

    let mut merged: HashMap<char, LetterStat> = session_stats
        .iter()
        .map(|s| (s.letter, s.clone()))
        .collect();
    for (&letter, times) in &history.historical_letters {
        if let Some(average_ms) = crate::engine::mean(times) {
            merged.insert(
                letter,
                LetterStat {
                    letter,
                    average_ms,
                    occurrences: times.len(),
                },
            );
        }
    }

    let mut stats: Vec<LetterStat> = merged.into_values().collect();
    sort_slowest_first(&mut stats);
    stats
}

fn sort_slowest_first(stats: &mut [LetterStat]) {
    stats.sort_by(|a, b| {
        b.average_ms
            .partial_cmp(&a.average_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.letter.cmp(&b.letter))
    });
}
