//! Fixed-width binning rules supplied by configuration.

use crate::utils::config::EDGE_EPSILON;
use serde::{Deserialize, Serialize};

/// `repeat` bins of fixed `width`.
///
/// A non-positive `width` splits the remaining range evenly into `repeat`
/// bins (at least one). A non-positive `repeat` fills the remaining range
/// with as many whole `width` bins as fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinRule {
    pub repeat: i64,
    pub width: f64,
}

impl BinRule {
    pub fn new(repeat: i64, width: f64) -> Self {
        Self { repeat, width }
    }
}

/// Walk `rules` upward from `x_min` and return the edges in decreasing order,
/// matching the adaptive rebinner's convention.
///
/// The walk stops as soon as `x_max` is reached within [`EDGE_EPSILON`];
/// `x_max` is appended if the rules fall short of it. An overshooting rule
/// is not clamped, so the result can fail edge validation downstream.
pub fn preset_edges(rules: &[BinRule], x_min: f64, x_max: f64) -> Vec<f64> {
    let mut edges = vec![x_min];
    let mut current = x_min;

    for rule in rules {
        let mut remaining = rule.repeat;
        let mut width = rule.width;
        if width <= 0.0 {
            if remaining <= 0 {
                remaining = 1;
            }
            width = (x_max - current) / remaining as f64;
        } else if remaining <= 0 {
            remaining = ((x_max - current) / width).floor() as i64;
        }

        while remaining > 0 && x_max - current > EDGE_EPSILON {
            current += width;
            edges.push(current);
            remaining -= 1;
        }
    }

    if (current - x_max).abs() > EDGE_EPSILON {
        edges.push(x_max);
    } else if let Some(last) = edges.last_mut() {
        *last = x_max;
    }

    edges.reverse();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EDGE_EPSILON, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_fixed_then_fill() {
        let edges = preset_edges(&[BinRule::new(2, 10.0), BinRule::new(0, 5.0)], 0.0, 100.0);

        let mut expected: Vec<f64> = vec![0.0, 10.0, 20.0];
        expected.extend((1..=16).map(|i| 20.0 + 5.0 * i as f64));
        expected.reverse();

        assert_close(&edges, &expected);
        assert_eq!(edges[0], 100.0);
    }

    #[test]
    fn test_short_rules_append_axis_maximum() {
        let edges = preset_edges(&[BinRule::new(3, 10.0)], 0.0, 100.0);
        assert_eq!(edges, vec![100.0, 30.0, 20.0, 10.0, 0.0]);
    }

    #[test]
    fn test_even_split_of_remaining_range() {
        let edges = preset_edges(&[BinRule::new(1, 50.0), BinRule::new(5, 0.0)], 0.0, 100.0);
        assert_close(&edges, &[100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 0.0]);
    }

    #[test]
    fn test_non_positive_repeat_and_width_is_one_bin() {
        let edges = preset_edges(&[BinRule::new(0, 0.0)], -1.0, 1.0);
        assert_eq!(edges, vec![1.0, -1.0]);
    }

    #[test]
    fn test_overshoot_is_not_monotonic() {
        // 0, 30, 60, 90, 120 then 100 appended
        let edges = preset_edges(&[BinRule::new(4, 30.0)], 0.0, 100.0);
        assert!(edges.windows(2).any(|w| w[0] <= w[1]));
    }
}
