pub mod rate;
pub mod snr;
pub mod waves;

pub use rate::{classify_rhythm, heart_rate, RhythmAnalysis, RhythmLabel};
pub use snr::{
    estimate_snr, periodogram, periodogram_snr, spectral_snr, statistical_snr,
    statistical_snr_axis, welch_psd, Axis, SnrMethod,
};
pub use waves::{
    analyze_pr_interval, analyze_st_segment, analyze_t_wave, PrAnalysis, StAnalysis, TWaveAnalysis,
    Verdict,
};
