use anyhow::{bail, Context};
use clap::Parser;
use code_compile::{CommandRegistry, CompileStatus, ProviderFactory};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Language identifier, e.g. gcc, g++, java, python3
    #[arg(short, long)]
    pub language: String,

    /// Source file, or `-` to read standard input
    #[arg(short, long, default_value = "-")]
    pub source: PathBuf,

    /// Existing directory the submission is written into
    #[arg(short, long, default_value_os_t = std::env::temp_dir())]
    pub work_dir: PathBuf,

    /// Command template document (JSON, or TOML with a `.toml` extension)
    #[arg(short, long)]
    pub commands: Option<PathBuf>,

    /// Toolchain timeout in seconds
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,

    /// Leave the generated files in place after compiling
    #[arg(long)]
    pub keep: bool,

    /// Fail early when the toolchain is not on PATH
    #[arg(long)]
    pub check_tools: bool,
}

/// What the CLI prints after a compile
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub language: String,
    pub success: bool,
    pub status: CompileStatus,
    pub diagnostic: String,
    /// Command line that starts the program, empty when compiling failed
    pub run_args: Vec<String>,
    pub real_time: bool,
    pub elapsed_ms: u64,
}

pub async fn run(args: Args) -> anyhow::Result<CompileReport> {
    let registry = CommandRegistry::load(args.commands.clone())
        .context("failed to load command templates")?;
    let factory = ProviderFactory::new(Arc::new(registry))
        .with_timeout(Duration::from_secs(args.timeout));

    if args.check_tools {
        let missing = factory.missing_tools(&args.language)?;
        if !missing.is_empty() {
            bail!("{} toolchain not found: {}", args.language, missing.join(", "));
        }
    }

    let source = read_source(&args.source).await?;
    let mut provider = factory.create(&args.language)?;
    let real_time = provider.is_real_time();
    provider.init(&source, &args.work_dir).await?;

    let outcome = match provider.compile().await {
        Ok(outcome) => outcome,
        Err(e) => {
            provider.clean().await;
            return Err(e.into());
        }
    };

    let run_args = if outcome.success {
        provider.run_args()?
    } else {
        vec![]
    };

    if args.keep {
        if let Some(files) = provider.detach() {
            info!("Keeping {}", files.source_path().display());
        }
    } else {
        provider.clean().await;
    }

    if !outcome.success {
        warn!("{} compile failed: {}", args.language, outcome.status);
    }

    Ok(CompileReport {
        language: args.language,
        success: outcome.success,
        status: outcome.status,
        diagnostic: outcome.diagnostic,
        run_args,
        real_time,
        elapsed_ms: outcome.elapsed.as_millis() as u64,
    })
}

async fn read_source(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        tokio::io::stdin()
            .read_to_string(&mut source)
            .await
            .context("failed to read source from stdin")?;
        return Ok(source);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}
