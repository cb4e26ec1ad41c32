/// Scale values to a percentage of the largest one.
///
/// Negative and non-finite values count as zero. When nothing is positive
/// every bar is empty.
pub fn bar_percentages(values: &[f64]) -> Vec<f64> {
    let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let max = values.iter().copied().map(clean).fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| clean(v) / max * 100.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_to_maximum() {
        assert_eq!(bar_percentages(&[50.0, 200.0, 100.0]), vec![25.0, 100.0, 50.0]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(bar_percentages(&[]).is_empty());
        assert_eq!(bar_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(
            bar_percentages(&[-5.0, f64::NAN, 10.0]),
            vec![0.0, 0.0, 100.0]
        );
    }
}
