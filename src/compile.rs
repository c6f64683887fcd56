use crate::cli::CompileArgs;
use crate::deck;
use crate::slides::SlideConfig;
use crate::source::{self, QuestionSource};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;

pub const JSON_ARTIFACT: &str = "compiledQuestions.json";
pub const DECK_ARTIFACT: &str = "all.md";

const TITLE_ENV_VAR: &str = "QBANK_TITLE";
const DEFAULT_TITLE: &str = "Question Bank";
const FRONT_MATTER_FILE: &str = "marpfrontmatter.md";

/// Normalized question record consumed by the quiz UI.
///
/// `correct_answer` is `None` (JSON `null`) when the source letter was
/// missing or malformed; consumers treat it as authoritative only when it
/// is a valid index into `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: Option<usize>,
    pub explanation: String,
    pub question_figures: Vec<String>,
    pub explain_figures: Vec<String>,
}

/// Run the full compilation: enumerate the bank, read every question, write
/// the JSON bank and the Marp deck.
pub fn run(args: &CompileArgs) -> Result<()> {
    let dirs = source::enumerate_question_dirs(&args.bank)?;
    let sources: Vec<QuestionSource> = dirs
        .iter()
        .map(|(id, dir)| source::read_question_dir(*id, dir))
        .collect();

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {}", args.output.display()))?;

    let slide_config = SlideConfig {
        max_lines_per_slide: args.max_lines_per_slide,
        max_line_length: args.max_line_length,
        max_chars_per_slide: args.max_chars_per_slide,
    };

    if !args.no_json {
        let records: Vec<CompiledQuestion> = sources
            .iter()
            .map(|src| compile_question(src, &args.figure_prefix))
            .collect();
        let path = args.output.join(JSON_ARTIFACT);
        let json = serde_json::to_string_pretty(&records)
            .context("Failed to serialize question bank")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write question bank: {}", path.display()))?;
        info!("Wrote {} records to {}", records.len(), path.display());
    }

    if !args.no_deck {
        let front_matter = load_front_matter(args);
        let blocks: Vec<(u32, String)> = sources
            .iter()
            .map(|src| (src.id, deck::question_block(src, &slide_config)))
            .collect();
        let doc = deck::assemble(&front_matter, &blocks, args.group_size);
        let path = args.output.join(DECK_ARTIFACT);
        fs::write(&path, doc)
            .with_context(|| format!("Failed to write slide deck: {}", path.display()))?;
        info!("Wrote slide deck to {}", path.display());
    }

    eprintln!(
        "Compiled {} questions to {}",
        sources.len(),
        args.output.display()
    );

    Ok(())
}

/// Map one source to its normalized record: keep non-empty options in A..E
/// order, convert the answer letter to a 0-based index, publish figure
/// paths under the configured prefix.
pub fn compile_question(src: &QuestionSource, figure_prefix: &str) -> CompiledQuestion {
    let options: Vec<String> = src
        .options
        .iter()
        .filter(|option| !option.is_empty())
        .cloned()
        .collect();

    CompiledQuestion {
        id: src.id,
        question: src.question.clone(),
        correct_answer: correct_answer_index(src, options.len()),
        options,
        explanation: src.explanation.clone(),
        question_figures: publish(&src.question_figures, figure_prefix),
        explain_figures: publish(&src.explain_figures, figure_prefix),
    }
}

fn publish(figures: &[String], prefix: &str) -> Vec<String> {
    figures
        .iter()
        .map(|figure| format!("{}/{figure}", prefix.trim_end_matches('/')))
        .collect()
}

/// `'A'..='E'` become indices 0..=4. Anything else is a data-quality
/// problem: warn and emit no index. A letter pointing past the kept
/// options is warned about but kept, since the record contract already
/// marks such indices as non-authoritative.
fn correct_answer_index(src: &QuestionSource, option_count: usize) -> Option<usize> {
    let letter = src.correct_answer.trim();
    let mut chars = letter.chars();
    let index = match (chars.next(), chars.next()) {
        (Some(c @ 'A'..='E'), None) => c as usize - 'A' as usize,
        _ => {
            warn!(
                "Question {}: missing or malformed correct answer {letter:?}",
                src.id
            );
            return None;
        }
    };
    if index >= option_count {
        warn!(
            "Question {}: correct answer {letter} has no matching option",
            src.id
        );
    }
    Some(index)
}

fn load_front_matter(args: &CompileArgs) -> String {
    let path = args
        .front_matter
        .clone()
        .or_else(|| args.bank.parent().map(|p| p.join(FRONT_MATTER_FILE)));

    if let Some(path) = path {
        match fs::read_to_string(&path) {
            Ok(content) => return content,
            Err(err) => warn!(
                "Front-matter template {} not readable ({err}); using a generated one",
                path.display()
            ),
        }
    }

    deck::default_front_matter(&resolve_title(args.title.as_deref()))
}

fn resolve_title(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(TITLE_ENV_VAR).ok())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}
