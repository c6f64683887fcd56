use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Compile a question-bank directory into a quiz JSON file and a Marp slide deck
#[derive(Parser, Debug)]
#[command(name = "qbank2marp", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every numeric question directory under the bank
    Compile(CompileArgs),

    /// Validate a saved-progress file against a compiled question bank
    CheckProgress(CheckProgressArgs),
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Question bank directory: one numeric subdirectory per question
    pub bank: PathBuf,

    /// Output directory for both artifacts
    #[arg(short, long, default_value = "dist/qabank")]
    pub output: PathBuf,

    /// Questions per section heading in the slide deck
    #[arg(long, default_value_t = 30)]
    pub group_size: u32,

    /// Maximum line-equivalents per explanation slide
    #[arg(long, default_value_t = 22)]
    pub max_lines_per_slide: usize,

    /// Line length at which an overlong line starts counting as extra lines
    #[arg(long, default_value_t = 120)]
    pub max_line_length: usize,

    /// Also cap the cumulative character count per slide
    #[arg(long)]
    pub max_chars_per_slide: Option<usize>,

    /// URL prefix for figure paths in the JSON artifact
    #[arg(long, default_value = "/qabank")]
    pub figure_prefix: String,

    /// Marp front-matter template.
    /// Defaults to marpfrontmatter.md next to the bank directory.
    #[arg(long)]
    pub front_matter: Option<PathBuf>,

    /// Deck title when no front-matter template is available.
    /// Falls back to the QBANK_TITLE environment variable.
    #[arg(long)]
    pub title: Option<String>,

    /// Skip the JSON artifact (deck only)
    #[arg(long, default_value_t = false)]
    pub no_json: bool,

    /// Skip the slide deck artifact (JSON only)
    #[arg(long, default_value_t = false)]
    pub no_deck: bool,
}

#[derive(Args, Debug)]
pub struct CheckProgressArgs {
    /// Saved-progress JSON file to validate
    pub progress: PathBuf,

    /// Compiled question bank (compiledQuestions.json) to validate against
    #[arg(short, long)]
    pub bank: PathBuf,
}
