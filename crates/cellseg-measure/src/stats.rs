//! Streaming summary statistics

/// Single-pass accumulator for count, sum, mean, spread and extremes
///
/// NaN samples are ignored. Every statistic of an empty accumulator is
/// NaN except [`count`](Self::count) and [`sum`](Self::sum), which are 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    sum_sq: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add one sample
    #[inline]
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Combine with another accumulator
    pub fn merge(&mut self, other: &RunningStats) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Number of samples added
    pub fn count(&self) -> u64 {
        self.count
    }

    /// True if no sample has been added
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sum of samples
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Arithmetic mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.sum / self.count as f64
    }

    /// Population variance
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        // Rounding can push a constant sequence slightly negative
        (self.sum_sq / n - mean * mean).max(0.0)
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest sample
    pub fn min(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.min }
    }

    /// Largest sample
    pub fn max(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.max }
    }

    /// `max - min`
    pub fn range(&self) -> f64 {
        self.max() - self.min()
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        for v in iter {
            stats.add(v);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let s: RunningStats = [1.0, 2.0, 3.0, 4.0].into_iter().collect();
        assert_eq!(s.count(), 4);
        assert_eq!(s.sum(), 10.0);
        assert_eq!(s.mean(), 2.5);
        assert!((s.variance() - 1.25).abs() < 1e-12);
        assert_eq!(s.min(), 1.0);
        assert_eq!(s.max(), 4.0);
        assert_eq!(s.range(), 3.0);
    }

    #[test]
    fn test_empty_is_nan() {
        let s = RunningStats::new();
        assert!(s.is_empty());
        assert!(s.mean().is_nan());
        assert!(s.std_dev().is_nan());
        assert!(s.min().is_nan());
        assert!(s.range().is_nan());
        assert_eq!(s.sum(), 0.0);
    }

    #[test]
    fn test_nan_skipped() {
        let s: RunningStats = [f64::NAN, 5.0].into_iter().collect();
        assert_eq!(s.count(), 1);
        assert_eq!(s.std_dev(), 0.0);
    }

    #[test]
    fn test_merge() {
        let mut a: RunningStats = [1.0, 2.0].into_iter().collect();
        let b: RunningStats = [3.0, 4.0].into_iter().collect();
        a.merge(&b);
        let all: RunningStats = [1.0, 2.0, 3.0, 4.0].into_iter().collect();
        assert_eq!(a, all);
        a.merge(&RunningStats::new());
        assert_eq!(a, all);
    }
}
