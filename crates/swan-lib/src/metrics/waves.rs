use crate::detectors::find_peaks;
use crate::error::AnalysisError;
use crate::signal::{PeakSet, Signal};
use serde::{Deserialize, Serialize};

/// Gap between an R peak and the start of its ST window.
const ST_OFFSET_S: f64 = 0.200;
/// Width of both the ST window and the per-beat baseline window.
const ST_SPAN_S: f64 = 0.080;
/// How far before each R peak to search for a P-wave candidate.
const P_SEARCH_S: f64 = 0.040;
/// How far after each R peak to search for a QRS-offset candidate.
const QRS_SEARCH_S: f64 = 0.100;

/// Two-way call used by the morphology checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Normal,
    Abnormal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StAnalysis {
    pub verdict: Verdict,
    /// Signed ST deviation of largest magnitude across the evaluated beats.
    pub max_deviation: f64,
    /// Isoelectric level pooled over the pre-R baseline windows.
    pub baseline: f64,
    pub beats_evaluated: usize,
    pub beats_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TWaveAnalysis {
    pub verdict: Verdict,
    pub amplitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrAnalysis {
    pub verdict: Verdict,
    pub mean_interval_s: f64,
    pub matched_beats: usize,
    pub intervals: Vec<f64>,
}

/// ST-segment deviation against a pooled baseline.
///
/// For every beat that leaves room, the 80 ms immediately before the R peak
/// feeds a shared isoelectric estimate and the 80 ms window starting 200 ms
/// after it is averaged into a per-beat ST level. Beats too close to either
/// record edge are skipped, not failed. A deviation of magnitude above
/// `threshold` marks the record abnormal.
pub fn analyze_st_segment(
    signal: &Signal,
    peaks: &PeakSet,
    threshold: f64,
) -> Result<StAnalysis, AnalysisError> {
    let samples = signal.samples();
    let offset = (ST_OFFSET_S * signal.fs()) as usize;
    let span = (ST_SPAN_S * signal.fs()) as usize;
    if span == 0 {
        return Err(AnalysisError::InsufficientData(format!(
            "sampling rate {} Hz cannot resolve an 80 ms window",
            signal.fs()
        )));
    }

    let mut baseline_sum = 0.0;
    let mut st_means = Vec::new();
    let mut beats_skipped = 0usize;
    for &r in &peaks.indices {
        let st_end = r + offset + span;
        if r < span || st_end > samples.len() {
            beats_skipped += 1;
            continue;
        }
        baseline_sum += samples[r - span..r].iter().sum::<f64>();
        let st_sum: f64 = samples[r + offset..st_end].iter().sum();
        st_means.push(st_sum / span as f64);
    }
    if st_means.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "no beat leaves room for both baseline and ST windows".into(),
        ));
    }

    let baseline = baseline_sum / (st_means.len() * span) as f64;
    let mut max_deviation = 0.0f64;
    for &st in &st_means {
        let deviation = st - baseline;
        if deviation.abs() > max_deviation.abs() {
            max_deviation = deviation;
        }
    }
    let verdict = if max_deviation.abs() > threshold {
        Verdict::Abnormal
    } else {
        Verdict::Normal
    };
    Ok(StAnalysis {
        verdict,
        max_deviation,
        baseline,
        beats_evaluated: st_means.len(),
        beats_skipped,
    })
}

/// Peak-to-peak amplitude inside the fixed T-wave region, namely the window
/// starting at 35% of the record and spanning the next 25%. A small
/// amplitude (below `threshold`) is the abnormal finding here.
pub fn analyze_t_wave(samples: &[f64], threshold: f64) -> Result<TWaveAnalysis, AnalysisError> {
    let n = samples.len();
    let start = (0.35 * n as f64) as usize;
    let span = (0.25 * n as f64) as usize;
    if span == 0 {
        return Err(AnalysisError::InsufficientData(format!(
            "{n} samples cannot host a T-wave window"
        )));
    }
    let window = &samples[start..start + span];
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for &v in window {
        low = low.min(v);
        high = high.max(v);
    }
    let amplitude = high - low;
    let verdict = if amplitude < threshold {
        Verdict::Abnormal
    } else {
        Verdict::Normal
    };
    Ok(TWaveAnalysis { verdict, amplitude })
}

/// Per-beat PR estimate.
///
/// Each beat pairs the first local maximum in the 40 ms before its R peak
/// (the P candidate) with the first local maximum in the 100 ms after it
/// (the QRS offset); the PR interval is the spacing of that pair. Beats
/// missing either candidate are dropped. The verdict compares the mean
/// interval against `target_s` with an inclusive `tolerance_s`.
pub fn analyze_pr_interval(
    signal: &Signal,
    peaks: &PeakSet,
    target_s: f64,
    tolerance_s: f64,
) -> Result<PrAnalysis, AnalysisError> {
    let samples = signal.samples();
    let n = samples.len();
    let p_win = (P_SEARCH_S * signal.fs()) as usize;
    let qrs_win = (QRS_SEARCH_S * signal.fs()) as usize;

    let mut intervals = Vec::new();
    for &r in &peaks.indices {
        if r >= n {
            continue;
        }
        let p_start = r.saturating_sub(p_win);
        let p_idx = match find_peaks(&samples[p_start..r], None).first() {
            Some(&idx) => p_start + idx,
            None => continue,
        };
        let qrs_end = (r + qrs_win).min(n);
        let q_idx = match find_peaks(&samples[r..qrs_end], None).first() {
            Some(&idx) => r + idx,
            None => continue,
        };
        intervals.push((q_idx - p_idx) as f64 / signal.fs());
    }
    if intervals.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "no beat produced both a P candidate and a QRS candidate".into(),
        ));
    }

    let mean_interval_s = intervals.iter().sum::<f64>() / intervals.len() as f64;
    let verdict = if (mean_interval_s - target_s).abs() <= tolerance_s {
        Verdict::Normal
    } else {
        Verdict::Abnormal
    };
    Ok(PrAnalysis {
        verdict,
        mean_interval_s,
        matched_beats: intervals.len(),
        intervals,
    })
}
