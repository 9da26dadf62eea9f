//! agrovoice-cli - Interactive leaf advisory console flow
//!
//! Asks which language the user prefers (speaking the prompt through the
//! TTS vendor and keyword-matching the typed reply), then classifies a
//! locally specified leaf image and speaks the advisory. Single pass, no
//! looping. Requires `DUBVERSE_API_KEY`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrovoice_common::advisory::advisory_for;
use agrovoice_common::classifier::{DiseaseClassifier, OnnxClassifier};
use agrovoice_common::config::{Config, ConfigOverrides};
use agrovoice_common::tts::DubverseClient;
use agrovoice_common::Language;

/// Command-line arguments for agrovoice-cli
#[derive(Parser, Debug)]
#[command(name = "agrovoice-cli")]
#[command(about = "Interactive leaf disease advisory console")]
#[command(version)]
struct Args {
    /// Leaf image to analyze (prompted for when omitted)
    image: Option<PathBuf>,

    /// Advisory language (asked interactively when omitted)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Path to the exported ONNX classification model
    #[arg(short, long, env = "AGROVOICE_MODEL")]
    model: Option<PathBuf>,

    /// Rendered-audio output file
    #[arg(long, env = "AGROVOICE_AUDIO_OUT")]
    audio_out: Option<PathBuf>,

    /// Config file path (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrovoice_cli=info,agrovoice_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting agrovoice-cli v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::resolve(ConfigOverrides {
        bind_addr: None,
        model_path: args.model,
        audio_output: args.audio_out,
        config_file: args.config,
    })?;

    // The console flow speaks every step; without a key there is nothing
    // useful to do.
    if config.api_key.is_none() {
        bail!("Dubverse API key not found; set DUBVERSE_API_KEY");
    }
    let tts = DubverseClient::new(config.api_key.clone());

    let language = match args.lang {
        Some(lang) => lang,
        None => ask_language(&tts, &config.audio_output).await?,
    };
    info!("Language: {}", language);

    let image_path = match args.image {
        Some(path) => path,
        None => PathBuf::from(read_line("Enter path of leaf image: ")?),
    };
    if !image_path.exists() {
        bail!("Invalid image path: {}", image_path.display());
    }

    println!("Detecting disease...");
    let classifier = OnnxClassifier::load(&config.model_path, config.labels.clone())
        .context("Failed to load classification model")?;
    let disease = classifier.classify(&image_path)?;

    let advisory = advisory_for(&disease, language);
    println!("Predicted disease: {}", disease);
    println!("Advisory ({}): {}", language, advisory);

    tts.speak(advisory, language, &config.audio_output)
        .await
        .context("Failed to render advisory audio")?;

    Ok(())
}

/// Speak and print the language prompt, then keyword-match the reply.
///
/// Unmatched input defaults to English.
async fn ask_language(tts: &DubverseClient, audio_output: &Path) -> Result<Language> {
    let prompt = "Which language do you prefer: English, Hindi, or Marathi";
    println!("{}?", prompt);
    if let Err(e) = tts.speak(prompt, Language::En, audio_output).await {
        warn!("Could not speak language prompt: {}", e);
    }

    let reply = read_line("Your language: ")?;
    match Language::from_keywords(&reply) {
        Some(lang) => Ok(lang),
        None => {
            warn!("Could not detect language; defaulting to English");
            Ok(Language::En)
        }
    }
}

/// Prompt on stdout and read one trimmed line from stdin
fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
