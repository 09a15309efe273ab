use std::collections::HashMap;

use crate::history::TimingHistory;

#[derive(Clone, Debug, PartialEq)]
pub struct BigramStat {
    pub bigram: String,
    pub average_ms: f64,
    pub occurrences: usize,
}

/// Per-bigram averages for the session so far, slowest first.
///
/// A pair counts only where both of its characters were typed correctly, and
/// its timings are consumed positionally per pair, the same way letter
/// timings are. Repeats of a bigram inside one word are averaged within that
/// word first, and the overall average is the mean of those per-word means,
/// so a word that repeats a bigram internally does not outweigh the rest.
/// `occurrences` still counts every raw observation.
pub fn bigram_stats(
    words: &[String],
    word_index: usize,
    completed_inputs: &[String],
    current_input: &str,
    bigram_timings: &HashMap<String, Vec<f64>>,
) -> Vec<BigramStat> {
    let mut cursors: HashMap<String, usize> = HashMap::new();
    // bigram -> (sum of per-word means, word count, raw occurrences)
    let mut acc: HashMap<String, (f64, usize, usize)> = HashMap::new();

    for (i, target) in words.iter().enumerate() {
        let typed = match completed_inputs.get(i) {
            Some(input) => input.as_str(),
            None if i == word_index => current_input,
            None => break,
        };
        let target_chars: Vec<char> = target.chars().collect();
        let typed_chars: Vec<char> = typed.chars().collect();

        let mut within: HashMap<String, (f64, usize)> = HashMap::new();
        for pos in 1..target_chars.len() {
            let both_correct = typed_chars.get(pos - 1) == Some(&target_chars[pos - 1])
                && typed_chars.get(pos) == Some(&target_chars[pos]);
            if !both_correct {
                continue;
            }
            let pair: String = [target_chars[pos - 1], target_chars[pos]].iter().collect();
            let cursor = cursors.entry(pair.clone()).or_insert(0);
            if let Some(&ms) = bigram_timings.get(&pair).and_then(|v| v.get(*cursor)) {
                let entry = within.entry(pair.clone()).or_insert((0.0, 0));
                entry.0 += ms;
                entry.1 += 1;
            }
            *cursor += 1;
        }

        for (pair, (sum, count)) in within {
            let entry = acc.entry(pair).or_insert((0.0, 0, 0));
            entry.0 += sum / count as f64;
            entry.1 += 1;
            entry.2 += count;
        }
    }

    let mut stats: Vec<BigramStat> = acc
        .into_iter()
        .map(|(bigram, (mean_sum, word_count, occurrences))| BigramStat {
            bigram,
            average_ms: mean_sum / word_count as f64,
            occurrences,
        })
        .collect();
    sort_slowest_first(&mut stats);
    stats
}

/// Merge policy mirrors `overall_letter_stats`: historical averages win for
/// keys with recorded history, session values fill in the rest, and before
/// the session has been absorbed the session stats pass through untouched.
pub fn overall_bigram_stats(
    session_stats: &[BigramStat],
    history: &TimingHistory,
    session_absorbed: bool,
) -> Vec<BigramStat> {
    if !session_absorbed {
        return session_stats.to_vec();
    }

    let mut merged: HashMap<String, BigramStat> = session_stats
        .iter()
        .map(|s| (s.bigram.clone(), s.clone()))
        .collect();
    for (bigram, times) in &history.historical_bigrams {
        if let Some(average_ms) = crate::engine::mean(times) {
            merged.insert(
                bigram.clone(),
                BigramStat {
                    bigram: bigram.clone(),
                    average_ms,
                    occurrences: times.len(),
                },
            );
        }
    }

    let mut stats: Vec<BigramStat> = merged.into_values().collect();
    sort_slowest_first(&mut stats);
    stats
}

fn sort_slowest_first(stats: &mut [BigramStat]) {
    stats.sort_by(|a, b| {
        b.average_ms
            .partial_cmp(&a.average_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.bigram.cmp(&b.bigram))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pairs_require_both_characters_correct() {
        let target = words(&["cat"]);
        let completed = words(&["cxt"]);
        let timings = HashMap::from([
            ("ca".to_string(), vec![100.0]),
            ("at".to_string(), vec![100.0]),
        ]);

        // 'a' was mistyped, so neither "ca" nor "at" qualifies
        let stats = bigram_stats(&target, 1, &completed, "", &timings);
        assert!(stats.is_empty());
    }

    #[test]
    fn repeats_within_a_word_average_before_combining() {
        // "papa" contains "pa" twice (150 and 250 -> word mean 200);
        // "pat" contains it once (400). Overall: (200 + 400) / 2 = 300,
        // not the raw mean (150 + 250 + 400) / 3.
        let target = words(&["papa", "pat"]);
        let completed = words(&["papa", "pat"]);
        let timings = HashMap::from([
            ("pa".to_string(), vec![150.0, 250.0, 400.0]),
            ("ap".to_string(), vec![100.0]),
            ("at".to_string(), vec![100.0]),
        ]);

        let stats = bigram_stats(&target, 2, &completed, "", &timings);
        let pa = stats.iter().find(|s| s.bigram == "pa").unwrap();
        assert_eq!(pa.average_ms, 300.0);
        assert_eq!(pa.occurrences, 3);
    }

    #[test]
    fn sorted_slowest_first() {
        let target = words(&["ab", "cd"]);
        let completed = words(&["ab", "cd"]);
        let timings = HashMap::from([
            ("ab".to_string(), vec![100.0]),
            ("cd".to_string(), vec![500.0]),
        ]);

        let stats = bigram_stats(&target, 2, &completed, "", &timings);
        assert_eq!(stats[0].bigram, "cd");
        assert_eq!(stats[1].bigram, "ab");
    }

    #[test]
    fn empty_inputs_yield_empty_stats() {
        let stats = bigram_stats(&[], 0, &[], "", &HashMap::new());
        assert!(stats.is_empty());
    }

    #[test]
    fn overall_unions_history_and_session_keys() {
        let session = vec![BigramStat {
            bigram: "ab".to_string(),
            average_ms: 100.0,
            occurrences: 1,
        }];
        let mut history = TimingHistory::default();
        history
            .historical_bigrams
            .insert("cd".to_string(), vec![600.0, 400.0]);

        let overall = overall_bigram_stats(&session, &history, true);
        assert_eq!(overall.len(), 2);
        assert_eq!(overall[0].bigram, "cd");
        assert_eq!(overall[0].average_ms, 500.0);
    }
}
