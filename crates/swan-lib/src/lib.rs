pub mod denoise;
pub mod detectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod signal;
pub mod wavelet;

pub use denoise::*;
pub use detectors::*;
pub use error::AnalysisError;
pub use metrics::*;
pub use pipeline::*;
pub use signal::*;
pub use wavelet::*;
