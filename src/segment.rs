//! Spatial stroke-to-letter partition.
//!
//! Assumes the word is written left to right with every letter spanning the
//! same width; no temporal or multi-stroke awareness.

use crate::stroke::Point;

/// Splits a stroke's points into `letter_count` ordered buckets by
/// horizontal position, preserving point order within each bucket. Callers
/// must guarantee `letter_count > 0`.
pub fn segment_letters(points: &[Point], letter_count: usize) -> Vec<Vec<Point>> {
    debug_assert!(letter_count > 0);
    let mut buckets: Vec<Vec<Point>> = vec![Vec::new(); letter_count];
    if points.is_empty() {
        return buckets;
    }

    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }

    let letter_width = (max_x - min_x) / letter_count as f32;
    for p in points {
        // zero horizontal extent: all ink belongs to the first letter
        let idx = if letter_width <= 0.0 {
            0
        } else {
            (((p.x - min_x) / letter_width) as usize).min(letter_count - 1)
        };
        buckets[idx].push(*p);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> Point {
        Point { x, y, t_ms: 0 }
    }

    #[test]
    fn splits_into_one_bucket_per_letter() {
        let points: Vec<Point> = (0..=9).map(|i| pt(i as f32 * 10.0, 0.0)).collect();
        let buckets = segment_letters(&points, 3);
        assert_eq!(buckets.len(), 3);
        // span is [0, 90], so each letter is 30 wide
        assert_eq!(buckets[0].len(), 3); // x = 0, 10, 20
        assert_eq!(buckets[1].len(), 3); // x = 30, 40, 50
        assert_eq!(buckets[2].len(), 4); // x = 60, 70, 80, 90 (max clamps in)
    }

    #[test]
    fn max_x_point_clamps_into_last_bucket() {
        let points = vec![pt(0.0, 0.0), pt(45.0, 0.0), pt(90.0, 0.0)];
        let buckets = segment_letters(&points, 3);
        // 90 / 30 floors to index 3; clamped to 2
        assert_eq!(buckets[2], vec![pt(90.0, 0.0)]);
    }

    #[test]
    fn zero_width_stroke_lands_in_first_bucket() {
        let points = vec![pt(5.0, 0.0), pt(5.0, 10.0), pt(5.0, 20.0)];
        let buckets = segment_letters(&points, 4);
        assert_eq!(buckets[0].len(), 3);
        assert!(buckets[1..].iter().all(|b| b.is_empty()));
    }

    #[test]
    fn preserves_point_order_within_buckets() {
        let points = vec![pt(10.0, 1.0), pt(80.0, 2.0), pt(20.0, 3.0), pt(85.0, 4.0)];
        let buckets = segment_letters(&points, 2);
        assert_eq!(buckets[0], vec![pt(10.0, 1.0), pt(20.0, 3.0)]);
        assert_eq!(buckets[1], vec![pt(80.0, 2.0), pt(85.0, 4.0)]);
    }

    #[test]
    fn empty_input_yields_empty_buckets() {
        let buckets = segment_letters(&[], 5);
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.is_empty()));
    }
}
