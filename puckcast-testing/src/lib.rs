//! Float assertions shared by the test suites of the workspace.

use assert_float_eq::*;

/// Asserts that two slices are element-wise within `distance` ULPs of each other.
pub fn assert_slice_f64_near(expected: &[f64], actual: &[f64], distance: u32) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_f64_near!(expected, actual, distance);
        }
    }
}

/// Asserts that two slices are element-wise within an absolute `epsilon` of each other.
///
/// Ledger quantities (profits, bankrolls) cross zero, where a relative comparison is meaningless.
pub fn assert_slice_f64_absolute(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_absolute_eq!(expected, actual, epsilon);
        }
    }
}

/// Asserts that the values sum to `expected` within an absolute `epsilon`.
pub fn assert_sum_f64_absolute(expected: f64, values: &[f64], epsilon: f64) {
    let sum: f64 = values.iter().sum();
    assert_float_absolute_eq!(expected, sum, epsilon);
}
