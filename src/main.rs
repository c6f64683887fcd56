mod cli;
mod compile;
mod deck;
mod session;
mod slides;
mod source;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = cli::Cli::parse();
    match cli.command {
        cli::Command::Compile(args) => compile::run(&args),
        cli::Command::CheckProgress(args) => check_progress(&args),
    }
}

fn check_progress(args: &cli::CheckProgressArgs) -> Result<()> {
    let bank_json = fs::read_to_string(&args.bank)
        .with_context(|| format!("Failed to read question bank: {}", args.bank.display()))?;
    let bank: Vec<compile::CompiledQuestion> = serde_json::from_str(&bank_json)
        .with_context(|| format!("Question bank is not valid JSON: {}", args.bank.display()))?;

    let progress_json = fs::read_to_string(&args.progress)
        .with_context(|| format!("Failed to read progress file: {}", args.progress.display()))?;

    match session::load_progress(&progress_json, &bank) {
        Ok(state) => {
            eprintln!(
                "Valid progress file: {} of {} questions answered, score {}",
                state.user_answers.len(),
                bank.len(),
                state.score
            );
            Ok(())
        }
        Err(err) => bail!("Invalid progress file format: {err}"),
    }
}
