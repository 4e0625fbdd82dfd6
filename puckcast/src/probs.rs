//! Numeric helpers for slices of probabilities and profits.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn mean(&self) -> f64;
    fn sample_stdev(&self) -> Option<f64>;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
    fn cumulative(&self) -> Vec<f64>;
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Arithmetic mean; zero for an empty slice.
    fn mean(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.sum() / self.len() as f64
        }
    }

    /// Standard deviation with Bessel's correction. Undefined for fewer than two elements.
    fn sample_stdev(&self) -> Option<f64> {
        if self.len() < 2 {
            return None;
        }
        let mean = self.mean();
        let sum_sq: f64 = self.iter().map(|value| (value - mean).powi(2)).sum();
        Some((sum_sq / (self.len() - 1) as f64).sqrt())
    }

    /// Scales the elements so that they sum to `target`, returning the sum prior to scaling.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        self.scale(target / sum);
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }

    /// Running sum.
    fn cumulative(&self) -> Vec<f64> {
        let mut total = 0.0;
        self.iter()
            .map(|&value| {
                total += value;
                total
            })
            .collect()
    }
}

/// Clamps a probability into `[epsilon, 1 - epsilon]`.
pub fn clip(prob: f64, epsilon: f64) -> f64 {
    prob.clamp(epsilon, 1.0 - epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;
    use puckcast_testing::assert_slice_f64_near;

    #[test]
    fn sum() {
        let data = [0.0, 0.1, 0.2];
        assert_f64_near!(0.3, data.sum(), 1);
    }

    #[test]
    fn mean() {
        let data = [1.0, 2.0, 3.0];
        assert_f64_near!(2.0, data.mean());
        let empty: [f64; 0] = [];
        assert_eq!(0.0, empty.mean());
    }

    #[test]
    fn sample_stdev() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_float_absolute_eq!(2.13809, data.sample_stdev().unwrap(), 1e-5);
        assert_eq!(None, [1.0].sample_stdev());
        let empty: [f64; 0] = [];
        assert_eq!(None, empty.sample_stdev());
        assert_eq!(Some(0.0), [3.0, 3.0].sample_stdev());
    }

    #[test]
    fn normalise() {
        let mut data = [0.6, 0.6];
        let sum = data.normalise(1.0);
        assert_f64_near!(1.2, sum, 1);
        assert_slice_f64_near(&[0.5, 0.5], &data, 2);
    }

    #[test]
    fn cumulative() {
        let data = [50.0, 50.0, -60.0, 40.0];
        assert_slice_f64_near(&[50.0, 100.0, 40.0, 80.0], &data.cumulative(), 1);
        let empty: [f64; 0] = [];
        assert!(empty.cumulative().is_empty());
    }

    #[test]
    fn clip_bounds() {
        assert_eq!(1e-6, clip(0.0, 1e-6));
        assert_eq!(1.0 - 1e-6, clip(1.0, 1e-6));
        assert_eq!(0.3, clip(0.3, 1e-6));
    }
}
