//! Regression test parameters and comparisons

use cellseg_core::Raster;

/// Regression test parameters
///
/// Tracks the state of a regression test: its name, the index of the
/// current comparison, and every failure recorded so far.
pub struct RegParams {
    /// Name of the test (e.g., "watershed")
    pub test_name: String,
    /// Current comparison index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "watershed")
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current comparison index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN never compares within delta, except NaN against NaN
        let matched = diff <= delta || (expected.is_nan() && actual.is_nan());
        if matched {
            true
        } else {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        }
    }

    /// Record a boolean condition
    ///
    /// # Arguments
    ///
    /// * `condition` - Value that must be true
    /// * `what` - Description used in the failure message
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if condition {
            true
        } else {
            let msg = format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            );
            self.fail(msg)
        }
    }

    /// Compare two rasters for exact equality
    ///
    /// # Returns
    ///
    /// `true` if the rasters have the same size and pixels.
    pub fn compare_rasters<T>(&mut self, r1: &Raster<T>, r2: &Raster<T>) -> bool
    where
        T: Copy + PartialEq + std::fmt::Debug,
    {
        self.index += 1;

        if r1.dimensions() != r2.dimensions() {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                r1.dimensions(),
                r2.dimensions()
            );
            return self.fail(msg);
        }

        let mismatch = r1
            .data()
            .iter()
            .zip(r2.data().iter())
            .position(|(a, b)| a != b);
        if let Some(i) = mismatch {
            let (x, y) = r1.coords(i);
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - pixel mismatch at ({}, {}): {:?} vs {:?}",
                self.test_name,
                self.index,
                x,
                y,
                r1.data()[i],
                r2.data()[i]
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two strings for equality
    pub fn compare_strings(&mut self, expected: &str, actual: &str) -> bool {
        self.index += 1;

        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 expected = {:?}, actual = {:?}",
                self.test_name, self.index, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_nan() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(f64::NAN, f64::NAN, 0.0));
        assert!(!rp.compare_values(0.0, f64::NAN, 1.0));
    }

    #[test]
    fn test_compare_rasters() {
        let mut rp = RegParams::new("test");
        let a = Raster::<u32>::from_data(2, 1, vec![1, 2]).unwrap();
        let b = Raster::<u32>::from_data(2, 1, vec![1, 3]).unwrap();
        assert!(rp.compare_rasters(&a, &a.clone()));
        assert!(!rp.compare_rasters(&a, &b));
        assert_eq!(rp.index(), 2);
    }
}
