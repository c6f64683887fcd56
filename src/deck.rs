use crate::slides::{self, SlideConfig};
use crate::source::{QuestionSource, OPTION_LETTERS};
use std::path::Path;

/// Marp front matter used when no template file is available
pub fn default_front_matter(title: &str) -> String {
    format!("---\nmarp: true\ntitle: {title}\n---\n")
}

/// Format one question as a run of Marp slides: heading + prompt + options +
/// answer, then the paginated explanation, then one slide per explanation
/// figure.
pub fn question_block(src: &QuestionSource, slide_config: &SlideConfig) -> String {
    let mut block = format!("## Question {}\n\n{}\n\n", src.id, src.question);

    for (letter, option) in OPTION_LETTERS.iter().zip(&src.options) {
        if !option.is_empty() {
            block.push_str(&format!("- {letter}. {option}\n"));
        }
    }

    if src.correct_answer.is_empty() {
        block.push_str("\n### Correct Answer\n\n");
    } else {
        block.push_str(&format!("\n### Correct Answer {}\n\n", src.correct_answer));
    }

    let explanation_slides = slides::paginate(&src.explanation, slide_config);
    if !explanation_slides.is_empty() {
        block.push_str(&explanation_slides.join("\n\n---\n\n"));
        block.push_str("\n\n");
    }

    for figure in &src.explain_figures {
        let stem = Path::new(figure)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        block.push_str(&format!(
            "---\n\n#### {stem}\n\n![bg w:1150px h:650px](./{figure})\n\n"
        ));
    }

    block
}

/// First id of the fixed-size group a question id falls into
fn group_start(id: u32, group_size: u32) -> u32 {
    (id - 1) / group_size * group_size + 1
}

fn group_heading(start: u32, group_size: u32) -> String {
    format!("# Questions {:03}-{:03}\n\n", start, start + group_size - 1)
}

/// Concatenate the whole deck: front matter, then each group's heading and
/// question blocks. Blocks within a group are separated by `---`, groups by
/// a blank-line-wrapped `---`. Callers must pass blocks ascending by id;
/// group membership depends only on id and group size.
pub fn assemble(front_matter: &str, blocks: &[(u32, String)], group_size: u32) -> String {
    let mut out = String::new();

    if !front_matter.trim().is_empty() {
        out.push_str(front_matter.trim_end());
        out.push_str("\n\n");
    }

    let mut current_group: Option<u32> = None;
    for (i, (id, block)) in blocks.iter().enumerate() {
        let start = group_start(*id, group_size);
        if current_group != Some(start) {
            if current_group.is_some() {
                out.push_str("\n---\n\n");
            }
            out.push_str(&group_heading(start, group_size));
            current_group = Some(start);
        } else if i > 0 {
            out.push_str("---\n\n");
        }
        out.push_str(block);
    }

    normalize(&out)
}

/// Collapse runs of blank lines and end with exactly one newline
fn normalize(doc: &str) -> String {
    let mut result = doc.to_string();
    while result.contains("\n\n\n") {
        result = result.replace("\n\n\n", "\n\n");
    }
    let trimmed = result.trim_end().to_string();
    if trimmed.is_empty() {
        String::new()
    } else {
        trimmed + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32) -> QuestionSource {
        QuestionSource {
            id,
            question: format!("Prompt {id}?"),
            options: [
                "alpha".to_string(),
                "beta".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ],
            explanation: "Because reasons.".to_string(),
            correct_answer: "A".to_string(),
            question_figures: Vec::new(),
            explain_figures: Vec::new(),
        }
    }

    #[test]
    fn block_lists_only_present_options() {
        let block = question_block(&question(4), &SlideConfig::default());
        assert!(block.starts_with("## Question 4\n\nPrompt 4?\n\n"));
        assert!(block.contains("- A. alpha\n"));
        assert!(block.contains("- B. beta\n"));
        assert!(!block.contains("- C."));
        assert!(block.contains("### Correct Answer A\n\nBecause reasons."));
    }

    #[test]
    fn block_adds_one_slide_per_figure() {
        let mut src = question(9);
        src.explain_figures = vec![
            "9/explain_figures/scan.png".to_string(),
            "9/explain_figures/staging.jpg".to_string(),
        ];
        let block = question_block(&src, &SlideConfig::default());
        assert!(block.contains("#### scan\n\n![bg w:1150px h:650px](./9/explain_figures/scan.png)"));
        assert!(block.contains("#### staging"));
        assert_eq!(block.matches("![bg").count(), 2);
    }

    #[test]
    fn groups_of_30_cover_1_to_45() {
        let blocks: Vec<(u32, String)> = (1..=45)
            .map(|id| (id, question_block(&question(id), &SlideConfig::default())))
            .collect();
        let doc = assemble("", &blocks, 30);
        assert!(doc.contains("# Questions 001-030\n"));
        assert!(doc.contains("# Questions 031-060\n"));
        let first = doc.find("# Questions 001-030").unwrap();
        let second = doc.find("# Questions 031-060").unwrap();
        assert!(first < second);
        let q30 = doc.find("## Question 30\n").unwrap();
        let q31 = doc.find("## Question 31\n").unwrap();
        assert!(first < q30 && q30 < second && second < q31);
    }

    #[test]
    fn front_matter_is_prepended_when_present() {
        let blocks = vec![(1, question_block(&question(1), &SlideConfig::default()))];
        let doc = assemble("---\nmarp: true\n---\n", &blocks, 30);
        assert!(doc.starts_with("---\nmarp: true\n---\n\n# Questions 001-030"));

        let bare = assemble("", &blocks, 30);
        assert!(bare.starts_with("# Questions 001-030"));
    }

    #[test]
    fn explanation_slides_are_separated_inside_a_block() {
        let mut src = question(2);
        src.explanation = (1..=25)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let block = question_block(&src, &SlideConfig::default());
        assert_eq!(block.matches("\n\n---\n\n").count(), 1);
    }

    #[test]
    fn document_ends_with_single_newline() {
        let blocks = vec![(1, question_block(&question(1), &SlideConfig::default()))];
        let doc = assemble("", &blocks, 30);
        assert!(doc.ends_with('\n'));
        assert!(!doc.ends_with("\n\n"));
        assert!(!doc.contains("\n\n\n"));
    }
}
