use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Srt,
}

#[derive(Parser)]
#[command(
    name = "subtrans",
    about = "YouTube subtitle fetcher and translator",
    version,
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Target translation language (no translation if omitted)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Source language passed to the translator
    #[arg(long, default_value = "auto")]
    pub source_lang: String,

    /// Output format: text (default), json, srt
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the subtitles to the local ledger after translating
    #[arg(short, long)]
    pub save: bool,

    /// Re-fetch even if the ledger already has this video/language
    #[arg(long)]
    pub refresh: bool,

    /// Treat example-subtitle fallback as a hard error
    #[arg(long)]
    pub no_fallback: bool,

    /// Print video title and channel to stderr
    #[arg(short, long)]
    pub info: bool,

    /// Record a demo payment for the video
    #[arg(long)]
    pub simulate_payment: bool,

    /// Show fetch/translate diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}
