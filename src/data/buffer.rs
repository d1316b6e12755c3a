//! Fixed-length rolling sample buffer and vertical auto-scaling.

use std::collections::VecDeque;

/// Fraction of the value span added above and below the data.
pub const BOUNDS_MARGIN: f64 = 0.1;

/// Half-height of the axis when every sample has the same value.
pub const FLAT_HALF_RANGE: f64 = 1.0;

/// Vertical axis range shown before the first sample arrives (24-bit ADC full scale).
pub const INITIAL_BOUNDS: Bounds = Bounds {
    min: -(0xFF_FFFF as f64),
    max: 0xFF_FFFF as f64,
};

/// Vertical display range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Rolling buffer of exactly `capacity` samples, oldest first.
///
/// Starts out all zero. Every append evicts the oldest sample, so the length
/// never changes.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    samples: VecDeque<i64>,
}

impl RollingBuffer {
    /// Panics if `capacity` is zero; `ScopeConfig::validate` rejects that earlier.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "rolling buffer capacity must be non-zero");
        Self {
            samples: std::iter::repeat(0).take(capacity).collect(),
        }
    }

    pub fn append(&mut self, value: i64) {
        self.samples.pop_front();
        self.samples.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn last(&self) -> Option<i64> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }

    /// `[index, value]` pairs ready for `egui_plot`.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.iter()
            .enumerate()
            .map(|(i, v)| [i as f64, v as f64])
            .collect()
    }

    /// Min/max of the contents widened by [`BOUNDS_MARGIN`] on each side.
    ///
    /// A flat buffer yields `(x - FLAT_HALF_RANGE, x + FLAT_HALF_RANGE)` so the
    /// axis keeps a non-zero height.
    pub fn current_bounds(&self) -> Bounds {
        let (min, max) = self
            .samples
            .iter()
            .fold((i64::MAX, i64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let (min, max) = (min as f64, max as f64);
        if max <= min {
            return Bounds {
                min: min - FLAT_HALF_RANGE,
                max: min + FLAT_HALF_RANGE,
            };
        }
        let margin = BOUNDS_MARGIN * (max - min);
        Bounds {
            min: min - margin,
            max: max + margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_all_zero() {
        let buf = RollingBuffer::new(250);
        assert_eq!(buf.capacity(), 250);
        assert_eq!(buf.to_vec().len(), 250);
        assert!(buf.iter().all(|v| v == 0));
    }

    #[test]
    fn length_is_constant_across_appends() {
        let mut buf = RollingBuffer::new(7);
        for v in 0..100 {
            buf.append(v * 3 - 50);
            assert_eq!(buf.to_vec().len(), 7);
        }
    }

    #[test]
    fn append_evicts_oldest_and_shifts_left() {
        let mut buf = RollingBuffer::new(4);
        for v in [1, 2, 3, 4] {
            buf.append(v);
        }
        assert_eq!(buf.to_vec(), vec![1, 2, 3, 4]);
        buf.append(5);
        assert_eq!(buf.to_vec(), vec![2, 3, 4, 5]);
        assert_eq!(buf.last(), Some(5));
    }

    #[test]
    fn partial_fill_keeps_leading_zeros() {
        let mut buf = RollingBuffer::new(5);
        buf.append(9);
        buf.append(-3);
        assert_eq!(buf.to_vec(), vec![0, 0, 0, 9, -3]);
    }

    #[test]
    fn bounds_add_ten_percent_margin() {
        let mut buf = RollingBuffer::new(2);
        buf.append(0);
        buf.append(10);
        let b = buf.current_bounds();
        assert!(approx(b.min, -1.0), "{b:?}");
        assert!(approx(b.max, 11.0), "{b:?}");
    }

    #[test]
    fn bounds_follow_negative_values() {
        let mut buf = RollingBuffer::new(3);
        for v in [-200, -100, -150] {
            buf.append(v);
        }
        let b = buf.current_bounds();
        assert!(approx(b.min, -210.0));
        assert!(approx(b.max, -90.0));
    }

    #[test]
    fn flat_buffer_is_widened_around_value() {
        let mut buf = RollingBuffer::new(3);
        for _ in 0..3 {
            buf.append(42);
        }
        let b = buf.current_bounds();
        assert!(approx(b.min, 42.0 - FLAT_HALF_RANGE));
        assert!(approx(b.max, 42.0 + FLAT_HALF_RANGE));
    }

    #[test]
    fn zero_buffer_bounds_are_centered_at_zero() {
        let b = RollingBuffer::new(10).current_bounds();
        assert!(approx(b.min + b.max, 0.0));
        assert!(b.max > b.min);
    }

    #[test]
    fn points_are_indexed_from_zero() {
        let mut buf = RollingBuffer::new(3);
        buf.append(7);
        assert_eq!(buf.points(), vec![[0.0, 0.0], [1.0, 0.0], [2.0, 7.0]]);
    }
}
