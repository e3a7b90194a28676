//! Driver Fatigue Monitoring System
//!
//! Dashboard server plus offline assessment, dataset and evaluation commands.

use clap::{Args, Parser, Subcommand};
use fatigue_monitor::{
    config::Config,
    dashboard::{start_dashboard, write_dataset_csv, AppState},
    ml::{generate_synthetic_data, label_rows, FatigueModel},
    scoring::RiskLevel,
    types::{DriverInput, DriverStatus, FeatureRow, TimeOfDay},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fatigue-monitor")]
#[command(about = "Driver fatigue assessment dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and serve the dashboard
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Assess a single driver from the command line
    Assess(AssessArgs),
    /// Write a labelled synthetic dataset to CSV
    Generate {
        #[arg(short, long)]
        samples: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "synthetic_drivers.csv")]
        output: PathBuf,
    },
    /// Train, then report accuracy on a fresh synthetic hold-out set
    Evaluate {
        #[arg(short, long, default_value = "1000")]
        samples: usize,
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

#[derive(Args, Debug)]
struct AssessArgs {
    #[arg(long, default_value = "Driver 1")]
    name: String,
    #[arg(long, default_value = "7.0")]
    sleep: f64,
    #[arg(long, default_value = "5.0")]
    driving: f64,
    #[arg(long, default_value = "1.0")]
    caffeine: f64,
    /// Rest break minutes
    #[arg(long, default_value = "30.0")]
    rest: f64,
    #[arg(long, default_value = "35")]
    age: u32,
    /// Stress level, 1-10
    #[arg(long, default_value = "4")]
    stress: u8,
    /// Morning, Afternoon or Night
    #[arg(long, default_value = "Morning")]
    time: TimeOfDay,
}

impl From<AssessArgs> for DriverInput {
    fn from(args: AssessArgs) -> Self {
        DriverInput {
            name: args.name,
            features: FeatureRow {
                sleep_hours: args.sleep,
                driving_hours: args.driving,
                caffeine_cups: args.caffeine,
                rest_breaks: args.rest,
                age: args.age,
                stress_level: f64::from(args.stress),
                time_of_day: args.time,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Assess(args) => assess(config, args.into()).await,
        Commands::Generate {
            samples,
            seed,
            output,
        } => generate(config, samples, seed, output),
        Commands::Evaluate { samples, seed } => evaluate(config, samples, seed).await,
    }
}

/// Training is CPU-bound, keep it off the async workers
async fn train(config: &Config) -> anyhow::Result<FatigueModel> {
    let model_config = config.model.clone();
    let model = tokio::task::spawn_blocking(move || FatigueModel::train(&model_config)).await??;
    Ok(model)
}

async fn serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting driver fatigue dashboard");
    if let Some(port) = port {
        config.server.port = port;
    }

    let model = Arc::new(train(&config).await?);
    let state = Arc::new(AppState::new(model, config.dashboard.clone()));

    start_dashboard(state, &config.server.host, config.server.port).await
}

async fn assess(config: Config, input: DriverInput) -> anyhow::Result<()> {
    input.validate()?;
    let model = train(&config).await?;
    let assessment = model.predict(&input.features)?;
    let level = RiskLevel::from_score(assessment.score);

    println!("\n🚗 Driver Assessment: {}\n", input.name);
    println!("Fatigue Score: {:.1} / 10 ({})", assessment.score, level.label());
    println!(
        "Prediction:    {} ({:.1}% confidence)",
        assessment.status,
        assessment.confidence * 100.0
    );
    println!("\n{}", level.action_message());

    Ok(())
}

fn generate(
    config: Config,
    samples: Option<usize>,
    seed: Option<u64>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let (samples, seed) = dataset_params(&config, samples, seed);

    let rows = label_rows(
        generate_synthetic_data(samples, seed),
        config.model.fatigue_threshold,
    );
    write_dataset_csv(&output, &rows)?;

    let fatigued = rows.iter().filter(|r| r.status == DriverStatus::Fatigued).count();
    println!(
        "Wrote {} rows to {} ({} fatigued, {} alert)",
        rows.len(),
        output.display(),
        fatigued,
        rows.len() - fatigued
    );
    Ok(())
}

/// Command-line values win over the `[model]` section
fn dataset_params(config: &Config, samples: Option<usize>, seed: Option<u64>) -> (usize, u64) {
    (
        samples.unwrap_or(config.model.samples),
        seed.unwrap_or(config.model.seed),
    )
}

async fn evaluate(config: Config, samples: usize, seed: u64) -> anyhow::Result<()> {
    let model = train(&config).await?;
    let report = model.report();

    println!("\n📊 Model Evaluation\n");
    println!("Training samples:  {}", report.samples);
    println!("Fatigued share:    {:.1}%", report.fatigued as f64 / report.samples as f64 * 100.0);
    println!("Trees:             {}", report.trees);
    println!("Training accuracy: {:.2}%", report.training_accuracy * 100.0);
    println!("Training time:     {} ms", report.elapsed_ms);

    let holdout = model.evaluate(samples, seed)?;
    println!("Hold-out accuracy: {:.2}% ({} rows, seed {})", holdout * 100.0, samples, seed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fatigue-monitor").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_assess_defaults_match_form_defaults() {
        let Commands::Assess(args) = parse(&["assess"]).command else {
            panic!("expected assess");
        };
        assert_eq!(DriverInput::from(args), DriverInput::default());
    }

    #[test]
    fn test_assess_args_map_to_input() {
        let cli = parse(&[
            "assess", "--name", "Jo", "--sleep", "5.5", "--driving", "10", "--caffeine", "3",
            "--rest", "12", "--age", "61", "--stress", "8", "--time", "Night",
        ]);
        let Commands::Assess(args) = cli.command else {
            panic!("expected assess");
        };
        let input = DriverInput::from(args);

        assert_eq!(input.name, "Jo");
        assert_eq!(input.features.sleep_hours, 5.5);
        assert_eq!(input.features.driving_hours, 10.0);
        assert_eq!(input.features.caffeine_cups, 3.0);
        assert_eq!(input.features.rest_breaks, 12.0);
        assert_eq!(input.features.age, 61);
        assert_eq!(input.features.stress_level, 8.0);
        assert_eq!(input.features.time_of_day, TimeOfDay::Night);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_assess_rejects_bad_values() {
        let argv = |extra: &[&'static str]| {
            let mut v = vec!["fatigue-monitor", "assess"];
            v.extend_from_slice(extra);
            v
        };
        assert!(Cli::try_parse_from(argv(&["--time", "Evening"])).is_err());
        assert!(Cli::try_parse_from(argv(&["--stress", "4.5"])).is_err());
        assert!(Cli::try_parse_from(argv(&["--age", "-3"])).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        assert_eq!(parse(&["serve"]).config, "config.toml");
        let cli = parse(&["--config", "alt.toml", "serve", "--port", "9000"]);
        assert_eq!(cli.config, "alt.toml");
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_dataset_params_fall_back_to_config() {
        let config = Config::default();
        assert_eq!(dataset_params(&config, None, None), (3000, 42));
        assert_eq!(dataset_params(&config, Some(10), Some(1)), (10, 1));

        let cli = parse(&["generate", "-s", "250", "-o", "out.csv"]);
        let Commands::Generate { samples, seed, output } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(dataset_params(&config, samples, seed), (250, 42));
        assert_eq!(output, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_evaluate_defaults() {
        let Commands::Evaluate { samples, seed } = parse(&["evaluate"]).command else {
            panic!("expected evaluate");
        };
        assert_eq!((samples, seed), (1000, 7));
    }
}
