//! Gas price sampling and fee-level estimation.
//!
//! The send flow offers slow/average/fast buttons when an estimate is
//! available. Levels are derived from a bounded window of recently sampled
//! gas prices: average minus/plus one population standard deviation.

use parking_lot::RwLock;
use std::collections::VecDeque;

/// Samples kept in the estimation window.
const MAX_SAMPLES: usize = 20;

/// Population standard deviation. Zero for empty and single-element input.
pub fn calculate_standard_deviation(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Fee levels in wei, offered to the user as slow/average/fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GasFeeLevels {
    pub slow: u128,
    pub average: u128,
    pub fast: u128,
}

/// Which estimate button the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GasLevel {
    Slow,
    Average,
    Fast,
}

impl GasFeeLevels {
    pub fn pick(&self, level: GasLevel) -> u128 {
        match level {
            GasLevel::Slow => self.slow,
            GasLevel::Average => self.average,
            GasLevel::Fast => self.fast,
        }
    }
}

pub struct GasFeeEstimator {
    samples: RwLock<VecDeque<u128>>,
}

impl GasFeeEstimator {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(VecDeque::with_capacity(MAX_SAMPLES)),
        }
    }

    /// Record a sampled gas price in wei, evicting the oldest sample once the
    /// window is full.
    pub fn record_sample(&self, price_wei: u128) {
        let mut samples = self.samples.write();
        if samples.len() == MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(price_wei);
    }

    /// Current fee levels, or None before the first sample arrives.
    pub fn levels(&self) -> Option<GasFeeLevels> {
        let samples = self.samples.read();
        if samples.is_empty() {
            return None;
        }

        let values: Vec<f64> = samples.iter().map(|s| *s as f64).collect();
        let average = values.iter().sum::<f64>() / values.len() as f64;
        let deviation = calculate_standard_deviation(&values);

        // Floor at 1 wei so a quiet window never offers a zero price.
        let slow = (average - deviation).max(1.0);
        let fast = average + deviation;

        Some(GasFeeLevels {
            slow: slow.round() as u128,
            average: average.round().max(1.0) as u128,
            fast: fast.round().max(1.0) as u128,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.samples.read().len()
    }
}

impl Default for GasFeeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_deviation_of_single_element_is_zero() {
        assert_eq!(calculate_standard_deviation(&[42.0]), 0.0);
        assert_eq!(calculate_standard_deviation(&[]), 0.0);
    }

    #[test]
    fn standard_deviation_of_known_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(calculate_standard_deviation(&values), 2.0);
    }

    #[test]
    fn no_levels_without_samples() {
        let estimator = GasFeeEstimator::new();
        assert!(estimator.levels().is_none());
    }

    #[test]
    fn uniform_samples_collapse_the_levels() {
        let estimator = GasFeeEstimator::new();
        for _ in 0..5 {
            estimator.record_sample(30_000_000_000);
        }
        let levels = estimator.levels().unwrap();
        assert_eq!(levels.slow, 30_000_000_000);
        assert_eq!(levels.average, 30_000_000_000);
        assert_eq!(levels.fast, 30_000_000_000);
    }

    #[test]
    fn spread_samples_widen_the_levels() {
        let estimator = GasFeeEstimator::new();
        for price in [20u128, 40, 40, 40, 50, 50, 70, 90] {
            estimator.record_sample(price);
        }
        let levels = estimator.levels().unwrap();
        assert_eq!(levels.average, 50);
        assert_eq!(levels.slow, 30);
        assert_eq!(levels.fast, 70);
    }

    #[test]
    fn window_is_bounded() {
        let estimator = GasFeeEstimator::new();
        for price in 0..100u128 {
            estimator.record_sample(price);
        }
        assert_eq!(estimator.sample_count(), MAX_SAMPLES);
        // Oldest samples were evicted, so the average reflects the tail.
        assert_eq!(estimator.levels().unwrap().average, 90);
    }
}
