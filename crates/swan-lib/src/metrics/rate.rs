use crate::signal::IntervalSeries;
use serde::{Deserialize, Serialize};

/// Rhythm call from RR-interval spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RhythmLabel {
    Regular,
    Irregular,
}

/// Rhythm label together with the spread it was judged on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RhythmAnalysis {
    pub label: RhythmLabel,
    pub rr_std_s: f64,
}

/// Mean heart rate in beats per minute.
///
/// Fewer than two peaks means no interval exists; the rate is reported as
/// zero rather than an error so a quiet record still produces a report.
pub fn heart_rate(rr: &IntervalSeries) -> f64 {
    match rr.mean() {
        Some(mean) if mean > 0.0 => 60.0 / mean,
        _ => 0.0,
    }
}

/// Regular when the population standard deviation of the RR intervals is
/// within `threshold` seconds (inclusive).
pub fn classify_rhythm(rr: &IntervalSeries, threshold: f64) -> RhythmAnalysis {
    let rr_std_s = rr.population_std();
    let label = if rr_std_s <= threshold {
        RhythmLabel::Regular
    } else {
        RhythmLabel::Irregular
    };
    RhythmAnalysis { label, rr_std_s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::PeakSet;

    #[test]
    fn even_beat_train_gives_exact_rate() {
        let peaks = PeakSet::from_indices(vec![0, 100, 200, 300]);
        let rr = IntervalSeries::from_peaks(&peaks, 100.0);
        assert_eq!(heart_rate(&rr), 60.0);
    }

    #[test]
    fn too_few_peaks_report_zero_rate() {
        let rr = IntervalSeries::from_peaks(&PeakSet::from_indices(vec![42]), 100.0);
        assert_eq!(heart_rate(&rr), 0.0);
        let rr = IntervalSeries::from_peaks(&PeakSet::default(), 100.0);
        assert_eq!(heart_rate(&rr), 0.0);
    }

    #[test]
    fn steady_intervals_are_regular() {
        let rr = IntervalSeries {
            secs: vec![0.8, 0.8, 0.8],
        };
        let out = classify_rhythm(&rr, 0.15);
        assert_eq!(out.label, RhythmLabel::Regular);
        assert_eq!(out.rr_std_s, 0.0);
    }

    #[test]
    fn alternating_intervals_are_irregular() {
        let rr = IntervalSeries {
            secs: vec![0.4, 1.2, 0.4, 1.2],
        };
        let out = classify_rhythm(&rr, 0.15);
        assert_eq!(out.label, RhythmLabel::Irregular);
        assert!((out.rr_std_s - 0.4).abs() < 1e-12);
    }

    #[test]
    fn spread_equal_to_the_threshold_is_still_regular() {
        let rr = IntervalSeries {
            secs: vec![0.5, 1.5],
        };
        let out = classify_rhythm(&rr, 0.5);
        assert_eq!(out.rr_std_s, 0.5);
        assert_eq!(out.label, RhythmLabel::Regular);
    }
}
