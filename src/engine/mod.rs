pub mod bigram_stats;
pub mod letter_stats;
pub mod targeting;
pub mod word_stats;

/// Arithmetic mean. Returns None for an empty slice so callers can treat
/// keys with no recorded timings as absent rather than dividing by zero.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
