use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Uniformly sampled single-lead recording.
///
/// The sampling rate is checked at construction and stays strictly positive
/// for the lifetime of the value, so index/time conversions downstream never
/// divide by zero. Serialization is one-way for the same reason.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Signal {
    fs: f64,
    data: Vec<f64>,
}

impl Signal {
    pub fn new(fs: f64, data: Vec<f64>) -> Result<Self, AnalysisError> {
        if !fs.is_finite() || fs <= 0.0 {
            return Err(AnalysisError::InvalidParameter(format!(
                "sampling rate must be positive and finite, got {fs}"
            )));
        }
        Ok(Self { fs, data })
    }

    /// Sampling frequency in Hz.
    pub fn fs(&self) -> f64 {
        self.fs
    }
    pub fn samples(&self) -> &[f64] {
        &self.data
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.fs
    }
    pub fn into_samples(self) -> Vec<f64> {
        self.data
    }
}

/// Detected peak positions (e.g. R-peak sample indices).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeakSet {
    pub indices: Vec<usize>,
}

impl PeakSet {
    /// Normalizes an arbitrary index list into sorted, duplicate-free form.
    pub fn from_indices(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Durations between consecutive peaks, in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntervalSeries {
    pub secs: Vec<f64>,
}

impl IntervalSeries {
    pub fn from_peaks(peaks: &PeakSet, fs: f64) -> Self {
        let mut secs = Vec::new();
        for w in peaks.indices.windows(2) {
            let dt = (w[1] as f64 - w[0] as f64) / fs;
            secs.push(dt);
        }
        Self { secs }
    }

    pub fn len(&self) -> usize {
        self.secs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.secs.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.secs.is_empty() {
            return None;
        }
        Some(self.secs.iter().sum::<f64>() / self.secs.len() as f64)
    }

    /// Population standard deviation; defined as 0.0 for series with fewer
    /// than two elements.
    pub fn population_std(&self) -> f64 {
        let n = self.secs.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.secs.iter().sum::<f64>() / n as f64;
        let var = self.secs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_rejects_bad_sampling_rates() {
        assert!(matches!(
            Signal::new(0.0, vec![1.0]),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            Signal::new(-125.0, vec![1.0]),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            Signal::new(f64::NAN, vec![1.0]),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(Signal::new(125.0, Vec::new()).is_ok());
    }

    #[test]
    fn peak_set_sorts_and_dedups() {
        let peaks = PeakSet::from_indices(vec![30, 10, 20, 10]);
        assert_eq!(peaks.indices, vec![10, 20, 30]);
    }

    #[test]
    fn intervals_come_from_successive_peaks() {
        let peaks = PeakSet::from_indices(vec![0, 100, 250]);
        let rr = IntervalSeries::from_peaks(&peaks, 100.0);
        assert_eq!(rr.secs, vec![1.0, 1.5]);
        assert_eq!(rr.mean(), Some(1.25));
    }

    #[test]
    fn degenerate_series_have_zero_std() {
        assert_eq!(IntervalSeries::default().population_std(), 0.0);
        let single = IntervalSeries { secs: vec![0.8] };
        assert_eq!(single.population_std(), 0.0);
    }

    #[test]
    fn population_std_matches_hand_computation() {
        // values 0.5 and 1.5: mean 1.0, deviations +-0.5, std exactly 0.5
        let rr = IntervalSeries {
            secs: vec![0.5, 1.5],
        };
        assert_eq!(rr.population_std(), 0.5);
        assert!(rr.mean().is_some());
    }
}
