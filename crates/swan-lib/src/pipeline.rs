use crate::denoise::denoise;
use crate::detectors::find_r_peaks;
use crate::error::AnalysisError;
use crate::metrics::{
    analyze_pr_interval, analyze_st_segment, analyze_t_wave, classify_rhythm, estimate_snr,
    heart_rate, PrAnalysis, RhythmAnalysis, SnrMethod, StAnalysis, TWaveAnalysis,
};
use crate::signal::{IntervalSeries, PeakSet, Signal};
use crate::wavelet::Wavelet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Everything the per-record pipeline can be tuned with.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub wavelet_family: String,
    pub wavelet_order: usize,
    pub level: usize,
    pub denoise_threshold: f64,
    pub r_peak_height: f64,
    pub rhythm_threshold: f64,
    pub st_threshold: f64,
    pub t_wave_threshold: f64,
    pub pr_target_s: f64,
    pub pr_tolerance_s: f64,
    pub snr: Option<SnrMethod>,
    pub keep_denoised: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            wavelet_family: "db".to_string(),
            wavelet_order: 4,
            level: 8,
            denoise_threshold: 0.0,
            r_peak_height: 0.2,
            rhythm_threshold: 0.15,
            st_threshold: 0.1,
            t_wave_threshold: 0.1,
            pr_target_s: 0.2,
            pr_tolerance_s: 0.04,
            snr: None,
            keep_denoised: false,
        }
    }
}

/// Full per-record result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub fs: f64,
    pub sample_count: usize,
    pub r_peaks: PeakSet,
    pub heart_rate_bpm: f64,
    pub rr_intervals: IntervalSeries,
    pub rhythm: RhythmAnalysis,
    pub st: StAnalysis,
    pub t_wave: TWaveAnalysis,
    pub pr: PrAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denoised: Option<Vec<f64>>,
}

/// Condition one record: denoise, then run every analyzer on the conditioned
/// waveform. The first error ends the record; neutral outcomes (an empty
/// peak set, a zero heart rate) do not.
pub fn analyze_record(signal: &Signal, config: &PipelineConfig) -> Result<Report, AnalysisError> {
    let wavelet = Wavelet::new(&config.wavelet_family, config.wavelet_order)?;
    let denoised = denoise(signal, &wavelet, config.level, config.denoise_threshold)?;
    let snr = match config.snr {
        Some(method) => Some(estimate_snr(method, signal, &denoised)?),
        None => None,
    };
    let r_peaks = find_r_peaks(&denoised, config.r_peak_height);
    let rr_intervals = IntervalSeries::from_peaks(&r_peaks, signal.fs());
    let heart_rate_bpm = heart_rate(&rr_intervals);
    let rhythm = classify_rhythm(&rr_intervals, config.rhythm_threshold);
    let st = analyze_st_segment(&denoised, &r_peaks, config.st_threshold)?;
    let t_wave = analyze_t_wave(denoised.samples(), config.t_wave_threshold)?;
    let pr = analyze_pr_interval(&denoised, &r_peaks, config.pr_target_s, config.pr_tolerance_s)?;
    Ok(Report {
        fs: signal.fs(),
        sample_count: signal.len(),
        r_peaks,
        heart_rate_bpm,
        rr_intervals,
        rhythm,
        st,
        t_wave,
        pr,
        snr,
        denoised: config.keep_denoised.then(|| denoised.into_samples()),
    })
}

/// Analyze independent records in parallel. Output order follows input
/// order and one failed record never takes down its neighbours.
pub fn analyze_batch(
    signals: &[Signal],
    config: &PipelineConfig,
) -> Vec<Result<Report, AnalysisError>> {
    signals
        .par_iter()
        .map(|signal| analyze_record(signal, config))
        .collect()
}
