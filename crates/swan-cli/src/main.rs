use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};
use swan_lib::{
    denoise::denoise,
    detectors::find_r_peaks,
    io::{table as table_io, text as text_io},
    metrics::{estimate_snr, SnrMethod},
    pipeline::{analyze_batch, analyze_record, PipelineConfig, Report},
    plot::{overlay_figure, residual_figure, Figure, Series},
    signal::Signal,
    wavelet::Wavelet,
};

#[derive(Parser)]
#[command(
    name = "swan",
    version,
    about = "SWAN: single-lead waveform analysis tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SnrKind {
    Statistical,
    Welch,
    Periodogram,
}

impl From<SnrKind> for SnrMethod {
    fn from(kind: SnrKind) -> Self {
        match kind {
            SnrKind::Statistical => SnrMethod::Statistical,
            SnrKind::Welch => SnrMethod::Welch,
            SnrKind::Periodogram => SnrMethod::Periodogram,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one record from stdin/--input, or every row of a --table CSV
    Analyze {
        #[arg(long, default_value_t = 125.0)]
        fs: f64,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        table: Option<PathBuf>,
        #[arg(long)]
        has_header: bool,
        #[arg(long, default_value = "db")]
        wavelet: String,
        #[arg(long, default_value_t = 4)]
        order: usize,
        #[arg(long, default_value_t = 8)]
        level: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
        #[arg(long, default_value_t = 0.2)]
        r_peak_height: f64,
        #[arg(long, default_value_t = 0.15)]
        rhythm_threshold: f64,
        #[arg(long, default_value_t = 0.1)]
        st_threshold: f64,
        #[arg(long, default_value_t = 0.1)]
        t_wave_threshold: f64,
        #[arg(long, default_value_t = 0.2)]
        pr_target: f64,
        #[arg(long, default_value_t = 0.04)]
        pr_tolerance: f64,
        #[arg(long)]
        snr: Option<SnrKind>,
        #[arg(long)]
        keep_denoised: bool,
    },
    /// Denoise a series and print the conditioned samples, one per line
    Denoise {
        #[arg(long, default_value_t = 125.0)]
        fs: f64,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value = "db")]
        wavelet: String,
        #[arg(long, default_value_t = 4)]
        order: usize,
        #[arg(long, default_value_t = 8)]
        level: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
    },
    /// Detect R-peaks and print them as JSON
    FindRpeaks {
        #[arg(long, default_value_t = 125.0)]
        fs: f64,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = 0.2)]
        height: f64,
    },
    /// Estimate the record's SNR (denoises internally with the same flags)
    Snr {
        #[arg(long, default_value_t = 125.0)]
        fs: f64,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        method: SnrKind,
        #[arg(long, default_value = "db")]
        wavelet: String,
        #[arg(long, default_value_t = 4)]
        order: usize,
        #[arg(long, default_value_t = 8)]
        level: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
    },
    /// Render the waveform and its conditioning residual to a PNG
    Plot {
        #[arg(long, default_value_t = 125.0)]
        fs: f64,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "db")]
        wavelet: String,
        #[arg(long, default_value_t = 4)]
        order: usize,
        #[arg(long, default_value_t = 8)]
        level: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
        #[arg(long, default_value_t = 2048)]
        max_points: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            fs,
            input,
            table,
            has_header,
            wavelet,
            order,
            level,
            threshold,
            r_peak_height,
            rhythm_threshold,
            st_threshold,
            t_wave_threshold,
            pr_target,
            pr_tolerance,
            snr,
            keep_denoised,
        } => {
            let config = PipelineConfig {
                wavelet_family: wavelet,
                wavelet_order: order,
                level,
                denoise_threshold: threshold,
                r_peak_height,
                rhythm_threshold,
                st_threshold,
                t_wave_threshold,
                pr_target_s: pr_target,
                pr_tolerance_s: pr_tolerance,
                snr: snr.map(Into::into),
                keep_denoised,
            };
            cmd_analyze(fs, input.as_deref(), table.as_deref(), has_header, &config)?
        }
        Commands::Denoise {
            fs,
            input,
            wavelet,
            order,
            level,
            threshold,
        } => cmd_denoise(fs, input.as_deref(), &wavelet, order, level, threshold)?,
        Commands::FindRpeaks { fs, input, height } => {
            cmd_find_rpeaks(fs, input.as_deref(), height)?
        }
        Commands::Snr {
            fs,
            input,
            method,
            wavelet,
            order,
            level,
            threshold,
        } => cmd_snr(fs, input.as_deref(), method, &wavelet, order, level, threshold)?,
        Commands::Plot {
            fs,
            input,
            out,
            wavelet,
            order,
            level,
            threshold,
            max_points,
        } => cmd_plot(
            fs,
            input.as_deref(),
            &out,
            &wavelet,
            order,
            level,
            threshold,
            max_points,
        )?,
    }
    Ok(())
}

fn read_samples(input: Option<&Path>) -> Result<Vec<f64>> {
    match input {
        Some(path) => text_io::read_sample_series(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_sample_series(&buf)
        }
    }
}

#[derive(Serialize)]
struct RecordLine<'a> {
    record: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_analyze(
    fs: f64,
    input: Option<&Path>,
    table: Option<&Path>,
    has_header: bool,
    config: &PipelineConfig,
) -> Result<()> {
    if let Some(path) = table {
        let rows = table_io::read_record_table(path, has_header)?;
        let signals = rows
            .into_iter()
            .map(|row| Signal::new(fs, row))
            .collect::<Result<Vec<_>, _>>()?;
        let results = analyze_batch(&signals, config);
        let mut failed = 0usize;
        for (record, result) in results.iter().enumerate() {
            let line = match result {
                Ok(report) => RecordLine {
                    record,
                    report: Some(report),
                    error: None,
                },
                Err(err) => {
                    failed += 1;
                    log::warn!("record {record}: {err}");
                    RecordLine {
                        record,
                        report: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            println!("{}", serde_json::to_string(&line)?);
        }
        log::info!("analyzed {} records, {failed} failed", results.len());
    } else {
        let signal = Signal::new(fs, read_samples(input)?)?;
        let report = analyze_record(&signal, config)?;
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

fn cmd_denoise(
    fs: f64,
    input: Option<&Path>,
    family: &str,
    order: usize,
    level: usize,
    threshold: f64,
) -> Result<()> {
    let signal = Signal::new(fs, read_samples(input)?)?;
    let wavelet = Wavelet::new(family, order)?;
    let denoised = denoise(&signal, &wavelet, level, threshold)?;
    for value in denoised.samples() {
        println!("{value}");
    }
    Ok(())
}

fn cmd_find_rpeaks(fs: f64, input: Option<&Path>, height: f64) -> Result<()> {
    let signal = Signal::new(fs, read_samples(input)?)?;
    let peaks = find_r_peaks(&signal, height);
    println!("{}", serde_json::to_string(&peaks)?);
    Ok(())
}

#[derive(Serialize)]
struct SnrLine {
    method: SnrMethod,
    snr: f64,
}

fn cmd_snr(
    fs: f64,
    input: Option<&Path>,
    method: SnrKind,
    family: &str,
    order: usize,
    level: usize,
    threshold: f64,
) -> Result<()> {
    let signal = Signal::new(fs, read_samples(input)?)?;
    let wavelet = Wavelet::new(family, order)?;
    let denoised = denoise(&signal, &wavelet, level, threshold)?;
    let snr = estimate_snr(method.into(), &signal, &denoised)?;
    println!(
        "{}",
        serde_json::to_string(&SnrLine {
            method: method.into(),
            snr,
        })?
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_plot(
    fs: f64,
    input: Option<&Path>,
    out: &Path,
    family: &str,
    order: usize,
    level: usize,
    threshold: f64,
    max_points: usize,
) -> Result<()> {
    let signal = Signal::new(fs, read_samples(input)?)?;
    let wavelet = Wavelet::new(family, order)?;
    let denoised = denoise(&signal, &wavelet, level, threshold)?;
    let top = overlay_figure(&signal, &denoised, max_points);
    let bottom = residual_figure(&signal, &denoised, max_points);

    let root = BitMapBackend::new(out, (800, 720)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));
    draw_figure_on(&panels[0], &top)?;
    draw_figure_on(&panels[1], &bottom)?;
    root.present()?;
    Ok(())
}

fn draw_figure_on(area: &DrawingArea<BitMapBackend, Shift>, fig: &Figure) -> Result<()> {
    let x_values: Vec<f64> = fig
        .series
        .iter()
        .flat_map(|series| match series {
            Series::Line(line) => line.points.iter().map(|p| p[0]).collect::<Vec<_>>(),
        })
        .collect();
    let y_values: Vec<f64> = fig
        .series
        .iter()
        .flat_map(|series| match series {
            Series::Line(line) => line.points.iter().map(|p| p[1]).collect::<Vec<_>>(),
        })
        .collect();
    let x_min = *x_values
        .iter()
        .min_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(&0.0);
    let x_max = *x_values
        .iter()
        .max_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(&1.0);
    let y_min = *y_values
        .iter()
        .min_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(&0.0);
    let y_max = *y_values
        .iter()
        .max_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(&1.0);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(
            fig.title.clone().unwrap_or_else(|| "Plot".into()),
            ("sans-serif", 24),
        )
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart.configure_mesh().draw()?;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                chart.draw_series(LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    &RGBColor(
                        ((line.style.color.0 >> 16) & 0xFF) as u8,
                        ((line.style.color.0 >> 8) & 0xFF) as u8,
                        (line.style.color.0 & 0xFF) as u8,
                    ),
                ))?;
            }
        }
    }
    Ok(())
}
