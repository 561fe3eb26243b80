//! gesture-dtw - train and run the DTW + k-NN gesture classifier
//!
//! stdout carries JSON records only; logs go to stderr.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gesture_core::config::{ConfigLoader, SystemConfig};
use gesture_core::inference::{classify_file, classify_frames, run_stream, write_line, ErrorRecord};
use gesture_core::landmarks::SequenceRecord;
use gesture_core::storage::{read_info, ModelStore};
use gesture_core::training::{train, JsonLinesSink};

/// DTW + k-NN gesture recognition
#[derive(Parser, Debug)]
#[command(name = "gesture-dtw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train from the gestures directory and save the model
    Train,

    /// Classify one sequence file, or a sequence read from stdin
    Classify {
        /// Sequence file (`{"frames": [...]}`)
        file: Option<PathBuf>,
    },

    /// Classify newline-delimited JSON requests from stdin
    Stream,

    /// Print the saved model metadata
    Info,

    /// Write the effective configuration as TOML
    ExportConfig {
        /// Output file
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ConfigLoader::with_file(path)?.load_system_config()?,
        None => ConfigLoader::new().load_system_config()?,
    };

    match cli.command {
        Commands::Train => run_train(&config),
        Commands::Classify { file } => run_classify(&config, file),
        Commands::Stream => run_stream_command(&config),
        Commands::Info => run_info(&config),
        Commands::ExportConfig { output } => {
            ConfigLoader::export_config(&config, &output)?;
            info!(path = %output.display(), "configuration exported");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_train(config: &SystemConfig) -> anyhow::Result<ExitCode> {
    let sink = JsonLinesSink::new(io::stdout());
    match train(config, &sink) {
        Ok(summary) => {
            info!(accuracy = summary.accuracy, samples = summary.total_samples, "model trained");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "training failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_classify(config: &SystemConfig, file: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    let model_path = config.paths.model_path();
    let model = match ModelStore::load(&model_path) {
        Ok(model) => model,
        Err(e) => {
            error!(error = %e, "no usable model");
            write_line(&mut stdout, &ErrorRecord::model_load(&model_path, &e))?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let outcome = match file {
        Some(path) => classify_file(&model.classifier, &path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            serde_json::from_str::<SequenceRecord>(&input)
                .map_err(Into::into)
                .and_then(|record| classify_frames(&model.classifier, &record.frames))
        }
    };

    match outcome {
        Ok(record) => write_line(&mut stdout, &record)?,
        Err(e) => write_line(&mut stdout, &ErrorRecord::new(e))?,
    }
    Ok(ExitCode::SUCCESS)
}

fn run_stream_command(config: &SystemConfig) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    let model_path = config.paths.model_path();
    let model = match ModelStore::load(&model_path) {
        Ok(model) => model,
        Err(e) => {
            error!(error = %e, "cannot start stream");
            write_line(&mut stdout, &ErrorRecord::model_load(&model_path, &e))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    run_stream(&model.classifier, &config.stream, io::stdin().lock(), stdout)?;
    Ok(ExitCode::SUCCESS)
}

fn run_info(config: &SystemConfig) -> anyhow::Result<ExitCode> {
    match read_info(&config.paths.info_path()) {
        Ok(text) => println!("{}", text.trim_end()),
        Err(_) => write_line(&mut io::stdout().lock(), &ErrorRecord::new("No model info found"))?,
    }
    Ok(ExitCode::SUCCESS)
}
