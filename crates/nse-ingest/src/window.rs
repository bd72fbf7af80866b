//! Batch window computation.

use std::ops::Range;

/// Compute the slice of the listing list processed by one run.
///
/// A cursor at or past the end restarts at 0. The window is shorter
/// than `batch_size` only when it reaches the end of the list.
pub fn batch_window(cursor: usize, len: usize, batch_size: usize) -> Range<usize> {
    let start = if cursor < len { cursor } else { 0 };
    let end = start.saturating_add(batch_size).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_from_start() {
        assert_eq!(batch_window(0, 120, 50), 0..50);
    }

    #[test]
    fn test_window_mid_list() {
        assert_eq!(batch_window(50, 120, 50), 50..100);
    }

    #[test]
    fn test_window_short_at_end() {
        assert_eq!(batch_window(100, 120, 50), 100..120);
    }

    #[test]
    fn test_window_wraps_at_end() {
        assert_eq!(batch_window(120, 120, 50), 0..50);
    }

    #[test]
    fn test_window_wraps_past_end() {
        // List shrank between runs.
        assert_eq!(batch_window(500, 120, 50), 0..50);
    }

    #[test]
    fn test_window_batch_larger_than_list() {
        assert_eq!(batch_window(0, 20, 50), 0..20);
        assert_eq!(batch_window(20, 20, 50), 0..20);
    }

    #[test]
    fn test_window_empty_list() {
        assert_eq!(batch_window(0, 0, 50), 0..0);
        assert_eq!(batch_window(7, 0, 50), 0..0);
    }

    #[test]
    fn test_window_never_overflows() {
        assert_eq!(batch_window(10, 20, usize::MAX), 10..20);
    }

    #[test]
    fn test_window_covers_every_cursor() {
        for len in 0..30 {
            for batch in 1..12 {
                for cursor in 0..40 {
                    let w = batch_window(cursor, len, batch);
                    let start = if cursor < len { cursor } else { 0 };
                    assert_eq!(w.start, start);
                    assert_eq!(w.end, (start + batch).min(len));
                    assert!(w.end <= len);
                }
            }
        }
    }
}
