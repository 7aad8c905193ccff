//! Derived statistics over rating submissions.

/// Arithmetic mean of one submission's scores, `None` when there are none.
pub fn submission_average(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let n = ratings.len() as f64;
    // Dividing first keeps large but finite scores from overflowing the sum.
    Some(ratings.iter().map(|r| r / n).sum())
}

/// Mean of the stored per-submission averages. An empty store averages to 0.
pub fn mean_of_averages<I>(averages: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    // Running mean, so the intermediate value never exceeds the largest input.
    averages
        .into_iter()
        .enumerate()
        .fold(0.0, |mean, (i, avg)| {
            let k = (i + 1) as f64;
            mean - mean / k + avg / k
        })
}
