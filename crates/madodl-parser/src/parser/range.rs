//! Range expansion shared by the filename and request interpreters.

/// Most values a single closed range may expand to.
pub const MAX_RANGE_LEN: usize = 100_000;

/// Values a closed range `start-end` adds after `start` itself.
///
/// Every whole number from `floor(start) + 1` through `floor(end)`, then
/// `end` if it is fractional. A range that runs backwards is read as
/// `start` to `floor(start) + end`; see [`is_reversed`].
///
/// Returns `None` when the range would add more than [`MAX_RANGE_LEN`]
/// values.
pub fn expand(start: f64, end: f64) -> Option<Vec<f64>> {
    let base = start.floor();
    let end = if is_reversed(start, end) { base + end } else { end };

    let whole = (end.floor() - base).max(0.0);
    let extra = if end.fract() != 0.0 { 1.0 } else { 0.0 };
    if whole + extra > MAX_RANGE_LEN as f64 {
        return None;
    }

    let mut values: Vec<f64> = ((base as i64 + 1)..=(end.floor() as i64))
        .map(|n| n as f64)
        .collect();
    if end.fract() != 0.0 {
        values.push(end);
    }
    Some(values)
}

/// Whether `start-end` is a backwards range. Only the whole part of
/// `start` counts, so `1.5-1` is a forward range that adds nothing.
pub fn is_reversed(start: f64, end: f64) -> bool {
    start.floor() > end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(start: f64, end: f64) -> Vec<f64> {
        expand(start, end).unwrap()
    }

    #[test]
    fn test_whole_range() {
        assert_eq!(values(1.0, 4.0), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_fractional_start() {
        assert_eq!(values(1.5, 3.0), vec![2.0, 3.0]);
    }

    #[test]
    fn test_fractional_end() {
        assert_eq!(values(1.0, 3.5), vec![2.0, 3.0, 3.5]);
    }

    #[test]
    fn test_degenerate_range() {
        assert!(values(3.0, 3.0).is_empty());
    }

    // Backwards ranges add the end to the start instead of swapping.
    #[test]
    fn test_reversed_range_quirk() {
        assert!(is_reversed(5.0, 2.0));
        assert_eq!(values(5.0, 2.0), vec![6.0, 7.0]);
        assert_eq!(values(10.0, 1.5), vec![11.0, 11.5]);
    }

    #[test]
    fn test_fractional_start_past_end_is_forward() {
        assert!(!is_reversed(1.5, 1.0));
        assert!(values(1.5, 1.0).is_empty());
        assert!(is_reversed(2.5, 1.0));
        assert_eq!(values(2.5, 1.0), vec![3.0]);
    }

    #[test]
    fn test_range_length_limit() {
        let limit = MAX_RANGE_LEN as f64;
        assert_eq!(values(0.0, limit).len(), MAX_RANGE_LEN);
        assert!(expand(0.0, limit + 1.0).is_none());
        assert!(expand(1.0, 4_000_000_000.0).is_none());
        // A reversed range grows by its end.
        assert!(expand(5e9, 1e9).is_none());
    }
}
