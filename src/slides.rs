use regex::Regex;
use std::sync::LazyLock;

/// Budgets controlling how an explanation is split into slides
#[derive(Debug, Clone)]
pub struct SlideConfig {
    /// Maximum line-equivalents per slide
    pub max_lines_per_slide: usize,
    /// Line length used to convert overlong lines into extra line-equivalents
    pub max_line_length: usize,
    /// Optional cumulative character cap per slide
    pub max_chars_per_slide: Option<usize>,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            max_lines_per_slide: 22,
            max_line_length: 120,
            max_chars_per_slide: None,
        }
    }
}

/// Citation-shaped lines: numbered ("1. Smith J, ...") or "Author Name, Journal Year"
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.|\w+\s+\w+,\s+\w+\s+\w+").unwrap());

pub fn is_reference_line(line: &str) -> bool {
    REFERENCE.is_match(line.trim())
}

/// How many slide lines this source line occupies once wrapped
fn line_weight(line: &str, max_line_length: usize) -> usize {
    line.chars().count().div_ceil(max_line_length.max(1)).max(1)
}

/// Split explanation text into slide-sized chunks.
///
/// Greedy accumulation by line weight: a line that would push the running
/// weight (or the optional char count) past the budget closes the current
/// slide and opens the next one. Reference lines never trigger a break and
/// are kept on the slide they follow, even past the budget. Slides never
/// open with blank lines, and whitespace-only slides are dropped.
///
/// Pure function of its inputs; an empty explanation yields no slides, and
/// a single line is never split no matter how long it is.
pub fn paginate(text: &str, config: &SlideConfig) -> Vec<String> {
    let mut slides: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut weight = 0usize;
    let mut chars = 0usize;

    for line in text.lines() {
        if current.is_empty() && line.trim().is_empty() {
            continue;
        }

        let len = line.chars().count();
        let over_lines = weight + line_weight(line, config.max_line_length) > config.max_lines_per_slide;
        let over_chars = config
            .max_chars_per_slide
            .is_some_and(|max| chars + len > max);

        if (over_lines || over_chars) && !current.is_empty() && !is_reference_line(line) {
            flush(&mut slides, &mut current);
            weight = 0;
            chars = 0;
            if line.trim().is_empty() {
                continue;
            }
        }

        current.push(line);
        weight += line_weight(line, config.max_line_length);
        chars += len;

        // Char-budget policy: a single overlong line ends its slide immediately
        if config.max_chars_per_slide.is_some()
            && len > config.max_line_length
            && !is_reference_line(line)
        {
            flush(&mut slides, &mut current);
            weight = 0;
            chars = 0;
        }
    }

    flush(&mut slides, &mut current);
    slides
}

fn flush(slides: &mut Vec<String>, current: &mut Vec<&str>) {
    if current.iter().any(|l| !l.trim().is_empty()) {
        slides.push(current.join("\n"));
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_lines: usize, max_line_length: usize) -> SlideConfig {
        SlideConfig {
            max_lines_per_slide: max_lines,
            max_line_length,
            max_chars_per_slide: None,
        }
    }

    #[test]
    fn empty_explanation_yields_no_slides() {
        assert!(paginate("", &SlideConfig::default()).is_empty());
        assert!(paginate("\n\n  \n", &SlideConfig::default()).is_empty());
    }

    #[test]
    fn short_explanation_is_a_single_slide() {
        let slides = paginate("one\ntwo\nthree", &SlideConfig::default());
        assert_eq!(slides, vec!["one\ntwo\nthree"]);
    }

    #[test]
    fn twenty_five_lines_split_as_22_plus_3() {
        let text = (1..=25)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let slides = paginate(&text, &config(22, 120));
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].lines().count(), 22);
        assert_eq!(slides[1].lines().count(), 3);
    }

    #[test]
    fn overlong_line_counts_as_multiple_line_equivalents() {
        // 250 chars / 120 => weight 3, so only 19 plain lines fit after it
        let long = "x".repeat(250);
        let mut lines = vec![long.as_str()];
        let plain: Vec<String> = (1..=20).map(|i| format!("line {i}")).collect();
        lines.extend(plain.iter().map(|s| s.as_str()));
        let slides = paginate(&lines.join("\n"), &config(22, 120));
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].lines().count(), 20); // long line + 19 plain
        assert_eq!(slides[1].lines().count(), 1);
    }

    #[test]
    fn reference_line_is_appended_past_the_budget() {
        let mut lines: Vec<String> = (1..=20).map(|i| format!("line {i}")).collect();
        lines.push("1. Smith J, et al. NEJM 2020.".to_string());
        let slides = paginate(&lines.join("\n"), &config(20, 120));
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].lines().count(), 21);
        assert!(slides[0].ends_with("1. Smith J, et al. NEJM 2020."));
    }

    #[test]
    fn reference_line_never_straddles_a_break() {
        let reference = "Smith John, NEJM 2020";
        let mut lines: Vec<String> = (1..=21).map(|i| format!("line {i}")).collect();
        lines.push(reference.to_string());
        lines.extend((22..=30).map(|i| format!("line {i}")));
        let slides = paginate(&lines.join("\n"), &config(22, 120));
        let containing: Vec<_> = slides.iter().filter(|s| s.contains(reference)).collect();
        assert_eq!(containing.len(), 1);
        assert!(containing[0].lines().any(|l| l == reference));
    }

    #[test]
    fn new_slides_never_open_with_blank_lines() {
        let mut lines: Vec<String> = (1..=22).map(|i| format!("line {i}")).collect();
        lines.push(String::new());
        lines.push(String::new());
        lines.push("tail".to_string());
        let slides = paginate(&lines.join("\n"), &config(22, 120));
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1], "tail");
    }

    #[test]
    fn single_oversized_line_stays_one_slide() {
        let line = "y".repeat(22 * 120 + 500);
        let slides = paginate(&line, &config(22, 120));
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0], line);
    }

    #[test]
    fn char_budget_breaks_early() {
        let lines: Vec<String> = (1..=10).map(|_| "a".repeat(100)).collect();
        let mut cfg = config(22, 120);
        cfg.max_chars_per_slide = Some(700);
        let slides = paginate(&lines.join("\n"), &cfg);
        // 7 * 100 = 700 fits; the 8th line would exceed it
        assert_eq!(slides[0].lines().count(), 7);
    }

    #[test]
    fn char_budget_overlong_line_ends_its_slide() {
        let long = "z".repeat(150);
        let text = format!("{long}\nshort one\nshort two");
        let mut cfg = config(22, 120);
        cfg.max_chars_per_slide = Some(700);
        let slides = paginate(&text, &cfg);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0], long);
    }

    #[test]
    fn pagination_is_deterministic() {
        let text = (1..=100)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let cfg = SlideConfig::default();
        assert_eq!(paginate(&text, &cfg), paginate(&text, &cfg));
    }

    #[test]
    fn recognizes_reference_shapes() {
        assert!(is_reference_line("1. Smith J, et al. NEJM 2020."));
        assert!(is_reference_line("  12. Trial results."));
        assert!(is_reference_line("Smith John, New England 2020"));
        assert!(!is_reference_line("A plain sentence."));
        assert!(!is_reference_line(""));
    }
}
