//! Greedy line breaking over the static metric table.
//!
//! Latin text breaks at spaces; full-width text may break between any two characters.
//! A Latin word wider than the line is hard-broken by character. Explicit `\n` always
//! starts a new line.

use crate::render::metrics::{is_full_width, MetricTable};

enum Token<'a> {
    Space,
    Word(&'a str),
}

/// Wraps `text` into lines no wider than `max_width_em`. Blank text yields no lines.
pub fn wrap_text(text: &str, max_width_em: f32, metrics: &MetricTable) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.trim().split('\n') {
        let before = lines.len();
        wrap_paragraph(paragraph.trim_end(), max_width_em, metrics, &mut lines);
        if lines.len() == before {
            lines.push(String::new());
        }
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_width: f32, metrics: &MetricTable, lines: &mut Vec<String>) {
    let mut line = String::new();
    let mut width = 0.0_f32;
    let mut pending_space = false;

    for token in tokenize(paragraph) {
        let word = match token {
            Token::Space => {
                pending_space = !line.is_empty();
                continue;
            }
            Token::Word(word) => word,
        };

        let word_w = metrics.measure_str(word);
        let space_w = if pending_space { metrics.space_width } else { 0.0 };
        pending_space = false;

        if !line.is_empty() && width + space_w + word_w > max_width {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        } else if space_w > 0.0 {
            line.push(' ');
            width += space_w;
        }

        if word_w <= max_width {
            line.push_str(word);
            width += word_w;
            continue;
        }

        for c in word.chars() {
            let char_w = metrics.char_width(c);
            if !line.is_empty() && width + char_w > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            line.push(c);
            width += char_w;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() || is_full_width(c) {
            if let Some(start) = run_start.take() {
                tokens.push(Token::Word(&text[start..i]));
            }
            if c.is_whitespace() {
                tokens.push(Token::Space);
            } else {
                tokens.push(Token::Word(&text[i..i + c.len_utf8()]));
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        tokens.push(Token::Word(&text[start..]));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::metrics::REPORT_METRICS;

    #[test]
    fn test_blank_text_has_no_lines() {
        assert!(wrap_text("", 10.0, &REPORT_METRICS).is_empty());
        assert!(wrap_text("  \n ", 10.0, &REPORT_METRICS).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("GPA 3.8", 40.0, &REPORT_METRICS), vec!["GPA 3.8"]);
    }

    #[test]
    fn test_cjk_breaks_between_any_characters() {
        let lines = wrap_text("保研定位与发展规划", 4.0, &REPORT_METRICS);
        assert_eq!(lines, vec!["保研定位", "与发展规", "划"]);
    }

    #[test]
    fn test_latin_breaks_at_spaces() {
        // "aaaa" = 4 × 0.56 = 2.24em; two words plus a space exceed 4em.
        let lines = wrap_text("aaaa aaaa aaaa", 4.0, &REPORT_METRICS);
        assert_eq!(lines, vec!["aaaa", "aaaa", "aaaa"]);
    }

    #[test]
    fn test_mixed_text_keeps_words_whole() {
        let lines = wrap_text("六级 560 分", 3.5, &REPORT_METRICS);
        assert_eq!(lines, vec!["六级", "560 分"]);
    }

    #[test]
    fn test_overlong_word_is_hard_broken() {
        let lines = wrap_text("mmmmmmmmmm", 2.0, &REPORT_METRICS);
        // m = 0.83em → two per line.
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| REPORT_METRICS.measure_str(l) <= 2.0));
    }

    #[test]
    fn test_explicit_newlines_start_new_lines() {
        let lines = wrap_text("1. 方向\n\n2. 期刊", 40.0, &REPORT_METRICS);
        assert_eq!(lines, vec!["1. 方向", "", "2. 期刊"]);
    }

    #[test]
    fn test_no_line_exceeds_width() {
        let text = "推免综合成绩由学业成绩与综合表现构成, with research bonus points capped at 5.";
        for line in wrap_text(text, 12.0, &REPORT_METRICS) {
            assert!(REPORT_METRICS.measure_str(&line) <= 12.0, "{line}");
        }
    }
}
