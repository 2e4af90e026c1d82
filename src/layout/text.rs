use crate::config::TextMetricsMode;
use crate::text_metrics;
use once_cell::sync::Lazy;
use regex::Regex;

/// `<br>` tags and real newlines are the only line-break markup; backslashes
/// in labels are literal text.
static BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|\r?\n").expect("valid line-break pattern"));

/// How label widths are measured during sizing.
#[derive(Debug, Clone, Copy)]
pub struct TextMeasure<'a> {
    mode: TextMetricsMode,
    font_family: &'a str,
}

impl<'a> TextMeasure<'a> {
    pub fn new(mode: TextMetricsMode, font_family: &'a str) -> Self {
        Self { mode, font_family }
    }

    pub fn estimate() -> TextMeasure<'static> {
        TextMeasure {
            mode: TextMetricsMode::Estimate,
            font_family: "",
        }
    }

    pub fn width(&self, text: &str, font_size: f32) -> f32 {
        match self.mode {
            TextMetricsMode::Estimate => estimate_width(text, font_size),
            TextMetricsMode::System => {
                text_metrics::measure_text_width(text, font_size, self.font_family)
                    .unwrap_or_else(|| estimate_width(text, font_size))
            }
        }
    }

    /// Greedy word wrap. Explicit breaks start a new paragraph; a word wider
    /// than `max_width` is placed alone on its line and allowed to overflow.
    pub fn wrap(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in BREAK_RE.split(text) {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if current.is_empty() {
                    current.push_str(word);
                    continue;
                }
                let candidate = format!("{current} {word}");
                if self.width(&candidate, font_size) > max_width {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }
}

/// Average-advance approximation of rendered width; no font access.
pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(advance_factor).sum::<f32>() * font_size.max(0.0)
}

/// Wraps with the estimate table.
pub fn wrap(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    TextMeasure::estimate().wrap(text, max_width, font_size)
}

fn advance_factor(ch: char) -> f32 {
    match ch {
        '\n' | '\r' => 0.0,
        ' ' | '\t' => 0.30,
        'i' | 'j' | 'l' | 'I' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.26,
        'f' | 'r' | 't' | '(' | ')' | '[' | ']' | '{' | '}' | '-' | '/' | '\\' => 0.35,
        'm' | 'w' => 0.84,
        'M' | 'W' | '@' | '%' | '&' | '#' => 0.93,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.58,
        'a'..='z' => 0.56,
        c if c.is_ascii() => 0.56,
        // CJK and other wide scripts
        c if is_wide(c) => 1.0,
        _ => 0.6,
    }
}

fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF)
}
