//! BEC Guard entrypoint: `train` fits and saves a model bundle from labeled CSV;
//! `score` loads the bundle and prints one verdict as JSON.

use anyhow::Context;
use bec_guard::{
    config::GuardConfig,
    features::{EmailSample, FeatureExtractor},
    lexicon::Lexicon,
    logging::StructuredLogger,
    pipeline::{load_csv, ScoringPipeline, Trainer},
};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "bec-guard", version, about = "Business email compromise risk scoring")]
struct Cli {
    /// Config file (defaults to $BEC_GUARD_CONFIG or config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the anomaly model on labeled emails and save the bundle
    Train {
        /// CSV with email_body, sender_role and is_bec columns
        #[arg(long)]
        data: PathBuf,
        /// Bundle output path (defaults to the configured model_path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score one email with a saved bundle
    Score {
        #[arg(long)]
        body: String,
        #[arg(long)]
        role: String,
        /// Bundle path (defaults to the configured model_path)
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(GuardConfig::default_path);
    let config = GuardConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let lexicon = Arc::new(Lexicon::new());
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Train { data, out } => {
            let rows = load_csv(&data).with_context(|| format!("loading {}", data.display()))?;
            let trainer = Trainer::new(FeatureExtractor::new(lexicon), config.forest.clone());
            let outcome = trainer.train(&rows).context("training failed")?;

            writeln!(stdout, "{}", outcome.report)?;
            let out = out.unwrap_or(config.model_path);
            outcome
                .bundle
                .save(&out)
                .with_context(|| format!("saving bundle to {}", out.display()))?;
            info!(path = %out.display(), "model saved");
        }
        Command::Score { body, role, model } => {
            let model_path = model.unwrap_or(config.model_path);
            let pipeline = ScoringPipeline::load(lexicon, &model_path)
                .with_context(|| format!("loading model from {}", model_path.display()))?;
            let verdict = pipeline.score(&EmailSample::new(body, role))?;
            StructuredLogger::emit_json(&verdict.to_report(), &mut stdout)?;
        }
    }

    Ok(())
}
