use clap::Parser;
use std::path::PathBuf;

/// Ask questions about the Visual Novel Database in plain language
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Ask a single question and exit; starts an interactive chat when omitted
    #[arg(index = 1)]
    pub prompt: Option<String>,

    /// Image files to send along with the prompt
    #[arg(short, long)]
    pub attach: Vec<PathBuf>,

    /// Path to the config file (defaults to ~/.config/vndb-explorer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Gemini API key (overrides the config file and GEMINI_API_KEY/API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// VNDB Kana API base URL
    #[arg(long)]
    pub vndb_endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
