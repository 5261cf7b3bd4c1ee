use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use petri_core::{init_logging, AppConfig};
use petri_io::{FrameArchive, FrameSink, NullSink};
use petri_lib::app::App;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "cfg.toml")]
    config: PathBuf,

    /// Output directory, overrides `output.directory`
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Directory searched for seed patterns
    #[arg(short, long, default_value = "patterns")]
    patterns: PathBuf,

    /// Noise seed, overrides `run.seed`
    #[arg(short, long)]
    seed: Option<u64>,

    /// Only write the report
    #[arg(long)]
    no_frames: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = AppConfig::load(&args.config)?;
    let timestamp = Utc::now().timestamp();
    let seed = args
        .seed
        .or(config.run.seed)
        .unwrap_or(timestamp.unsigned_abs());
    let file_name = format!("{}{}", config.output.file_name, timestamp);
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));

    let mut app = App::new(config, seed)?;
    app.seed_dish(&args.patterns)?;

    let mut sink: Box<dyn FrameSink> = if args.no_frames {
        Box::new(NullSink::default())
    } else {
        Box::new(FrameArchive::create(
            out_dir.join(format!("{file_name}.frames.gz")),
            app.canvas.pixel_width(),
            app.canvas.pixel_height(),
        )?)
    };

    let outcome = app.run(sink.as_mut())?;
    sink.finish()?;

    let report_path = out_dir.join(format!("{file_name}.html"));
    let report = app.save_report(&report_path, &file_name)?;

    tracing::info!(
        %outcome,
        frames = sink.frame_count(),
        generations = report.summary.generations,
        mean_step_us = app.metrics.mean_step_time().as_micros() as u64,
        report = %report_path.display(),
        "Run finished"
    );
    println!("{file_name}: {outcome}");

    Ok(())
}
