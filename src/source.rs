use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const OPTION_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// One question directory's worth of raw input.
///
/// Figure entries are bank-relative paths (`<dir>/question_figures/<file>`);
/// each artifact prepends its own prefix when publishing them.
#[derive(Debug)]
pub struct QuestionSource {
    pub id: u32,
    pub question: String,
    /// Option texts in A..E order; absent options are empty strings
    pub options: [String; 5],
    pub explanation: String,
    /// Raw trimmed correct-answer letter, empty when the file is missing
    pub correct_answer: String,
    pub question_figures: Vec<String>,
    pub explain_figures: Vec<String>,
}

/// List the numeric question directories under the bank root, ascending by id.
///
/// An unreadable bank root is fatal (no questions could be produced);
/// non-numeric entries are skipped.
pub fn enumerate_question_dirs(bank_dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let entries = fs::read_dir(bank_dir)
        .with_context(|| format!("Failed to read question bank: {}", bank_dir.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list {}", bank_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = name.parse::<u32>() {
                dirs.push((id, entry.path()));
                continue;
            }
        }
        debug!("Skipping non-numeric entry: {name}");
    }

    dirs.sort_by_key(|(id, _)| *id);
    Ok(dirs)
}

/// Read one question directory. Never fails: a missing or unreadable file
/// degrades to an empty value for that field, a missing figures directory
/// to an empty list.
pub fn read_question_dir(id: u32, dir: &Path) -> QuestionSource {
    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string());

    let options =
        OPTION_LETTERS.map(|letter| read_text_file(&dir.join(format!("option_{letter}.txt"))));

    QuestionSource {
        id,
        question: read_text_file(&dir.join("question.txt")),
        options,
        explanation: read_text_file(&dir.join("explain.txt")),
        correct_answer: read_text_file(&dir.join("correct_answer.txt")),
        question_figures: figures_in(dir, &dir_name, "question_figures"),
        explain_figures: figures_in(dir, &dir_name, "explain_figures"),
    }
}

fn read_text_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content.trim().to_string(),
        Err(err) => {
            warn!("Could not read {}: {err}", path.display());
            String::new()
        }
    }
}

/// Image files under `<dir>/<subdir>`, as `<dir_name>/<subdir>/<file>` paths,
/// sorted by filename. A missing directory yields an empty list.
fn figures_in(dir: &Path, dir_name: &str, subdir: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir.join(subdir)) else {
        return Vec::new();
    };

    let mut figures: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| is_image_file(name))
        .map(|name| format!("{dir_name}/{subdir}/{name}"))
        .collect();

    figures.sort();
    figures
}

fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
