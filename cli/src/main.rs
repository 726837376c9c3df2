mod batch;
mod decode;
mod ime;
mod resources;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hanziime_core::DecoderConfig;

#[derive(Parser)]
#[command(name = "hanziime", about = "Toneless pinyin -> hanzi HMM decoder")]
struct Args {
    /// Optional TOML file overriding default top-k/beam-size/select-keys.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a single whitespace-separated pinyin sequence.
    Decode {
        /// e.g. "ni hao"
        pinyin: String,
        #[arg(long)]
        lexicon: PathBuf,
        #[arg(long)]
        params: PathBuf,
        #[arg(long)]
        bonus: Option<PathBuf>,
        #[arg(short, long)]
        k: Option<usize>,
        #[arg(long)]
        beam: Option<usize>,
    },
    /// Decode a file of one pinyin sequence per line.
    Batch {
        input: PathBuf,
        #[arg(long)]
        lexicon: PathBuf,
        #[arg(long)]
        params: PathBuf,
        #[arg(long)]
        bonus: Option<PathBuf>,
        #[arg(short, long)]
        k: Option<usize>,
        #[arg(long)]
        reference: Option<PathBuf>,
    },
    /// Line-oriented REPL over the incremental decoder.
    Ime {
        #[arg(long)]
        lexicon: PathBuf,
        #[arg(long)]
        params: PathBuf,
        #[arg(long)]
        bonus: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DecoderConfig> {
    match path {
        Some(path) => DecoderConfig::load_toml(path)
            .with_context(|| format!("loading decoder config from {}", path.display())),
        None => Ok(DecoderConfig::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let result = load_config(args.config.as_ref()).and_then(|config| match args.command {
        Command::Decode {
            pinyin,
            lexicon,
            params,
            bonus,
            k,
            beam,
        } => decode::run(&config, &pinyin, &lexicon, &params, bonus.as_deref(), k, beam),
        Command::Batch {
            input,
            lexicon,
            params,
            bonus,
            k,
            reference,
        } => batch::run(&config, &input, &lexicon, &params, bonus.as_deref(), k, reference.as_deref()),
        Command::Ime {
            lexicon,
            params,
            bonus,
        } => ime::run(&config, &lexicon, &params, bonus.as_deref()),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("⚠ {err:#}");
            ExitCode::FAILURE
        }
    }
}
