use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use respectrewrite::config::Config;
use respectrewrite::format;
use respectrewrite::generation::explainer::ExplanationGenerator;
use respectrewrite::generation::groq::GroqClient;
use respectrewrite::generation::prompt::GenerationParams;
use respectrewrite::output::terminal;
use respectrewrite::pipeline::ModerationPipeline;
use respectrewrite::toxicity::gate::ToxicityGate;
use respectrewrite::toxicity::traits::ToxicityScorer;

/// Sample messages run by `smoke`.
const SMOKE_SAMPLES: [&str; 4] = [
    "you are stupid",
    "go back to your country",
    "women can't do math",
    "I wish you were dead",
];

/// respectrewrite: toxicity gate and harm explanations for the RespectRewrite extension.
///
/// Scores each message with a local classifier and, only when it is toxic,
/// asks a hosted model for a two-sentence explanation of the harm.
#[derive(Parser)]
#[command(name = "respectrewrite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway (POST /rewrite)
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Moderate one message and print the verdict and explanation
    Check {
        /// The message to moderate
        text: String,
    },

    /// Score one message with the toxicity gate only (no generation call)
    Score {
        /// The message to score
        text: String,
    },

    /// Run the sample messages through the pipeline and check the output format
    Smoke,

    /// Download the ONNX toxicity model (~126 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("respectrewrite=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let pipeline = build_pipeline(&config)?;
            respectrewrite::web::run_server(pipeline, port, &bind).await?;
        }

        Commands::Check { text } => {
            let config = Config::load()?;
            let pipeline = build_pipeline(&config)?;
            let result = pipeline.moderate_text(&text).await?;
            terminal::display_result(&text, &result);
        }

        Commands::Score { text } => {
            let config = Config::load()?;
            config.require_scorer()?;
            let gate = ToxicityGate::new(create_scorer(&config)?, config.threshold);
            let result = gate.score_detailed(&text).await?;
            terminal::display_score(&text, &result, gate.threshold(), gate.backend());
        }

        Commands::Smoke => {
            let config = Config::load()?;
            let pipeline = build_pipeline(&config)?;

            println!("Running {} sample messages...", SMOKE_SAMPLES.len());
            println!("{}", "-".repeat(50).dimmed());

            for sample in SMOKE_SAMPLES {
                println!("\nInput: '{sample}'");
                match pipeline.moderate_text(sample).await {
                    Ok(result) => match result.explanation {
                        Some(explanation) => {
                            let check = format::inspect(&explanation.text);
                            terminal::display_contract_check(&explanation.text, &check);
                        }
                        None => println!("  {} scored safe, no explanation", "-".dimmed()),
                    },
                    Err(e) => println!("  {} {e}", "error".red().bold()),
                }
            }

            println!("\n{}", "-".repeat(50).dimmed());
            println!("{}", "Smoke run complete.".bold());
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX toxicity model...");
            println!("  Destination: {}", model_dir.display());

            respectrewrite::toxicity::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `respectrewrite serve` or `respectrewrite check \"...\"`.");
        }
    }

    Ok(())
}

/// Build both capability handles and the pipeline. Runs once at startup;
/// any missing credential or model file aborts here.
fn build_pipeline(config: &Config) -> Result<ModerationPipeline> {
    config.require_generation()?;
    config.require_scorer()?;

    let gate = ToxicityGate::new(create_scorer(config)?, config.threshold);

    let groq = GroqClient::new(
        config.groq_api_key.clone(),
        &config.groq_api_url,
        config.generation_timeout,
    )?;
    let generator = ExplanationGenerator::new(
        Arc::new(groq),
        GenerationParams::with_model(config.generation_model.clone()),
    );

    let pipeline = ModerationPipeline::new(gate, generator);
    info!(
        scorer = pipeline.gate().backend(),
        threshold = pipeline.gate().threshold(),
        model = %pipeline.generator().params().model,
        "Moderation pipeline ready"
    );

    Ok(pipeline)
}

/// Load the local ONNX toxicity scorer from the configured model directory.
fn create_scorer(config: &Config) -> Result<Arc<dyn ToxicityScorer>> {
    info!("Using local ONNX toxicity scorer");
    let scorer = respectrewrite::toxicity::onnx::OnnxToxicityScorer::load(&config.model_dir)?;
    Ok(Arc::new(scorer))
}
