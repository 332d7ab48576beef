//! Fits a node label into a fixed-size box.
//!
//! Two stages: a character budget first (with `…`), then greedy word wrapping limited to a
//! number of lines (with `…` on the last kept line). Words are never split, so one very long
//! word can still overflow its line. The untruncated input is always kept in `full_text`.

use crate::{Error, Result};
use impactmap_core::ImpactMapConfig;
use serde::{Deserialize, Serialize};

pub const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitOptions {
    pub max_chars: usize,
    pub max_chars_per_line: usize,
    pub max_lines: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_chars: 60,
            max_chars_per_line: 30,
            max_lines: 2,
        }
    }
}

impl FitOptions {
    pub fn from_config(cfg: &ImpactMapConfig) -> Result<Self> {
        let d = Self::default();
        let read = |path: &str, default: usize| -> Result<usize> {
            match cfg.get_f64(path) {
                None => Ok(default),
                Some(_) => cfg
                    .get_usize(path)
                    .filter(|v| *v > 0)
                    .ok_or_else(|| Error::InvalidConfig {
                        message: format!("`{path}` must be a positive integer"),
                    }),
            }
        };
        Ok(Self {
            max_chars: read("text.maxChars", d.max_chars)?,
            max_chars_per_line: read("text.maxCharsPerLine", d.max_chars_per_line)?,
            max_lines: read("text.maxLines", d.max_lines)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FittedText {
    pub display_lines: Vec<String>,
    pub is_truncated: bool,
    pub full_text: String,
}

/// Cuts `text` to `max_chars` characters and appends `…` when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text.to_string(), false),
        Some((byte_idx, _)) => {
            let mut out = String::with_capacity(byte_idx + ELLIPSIS.len_utf8());
            out.push_str(&text[..byte_idx]);
            out.push(ELLIPSIS);
            (out, true)
        }
    }
}

/// Greedy word wrap. A word joins the current line while the line's length plus the word's
/// length stays within `max_chars_per_line`; the joining space is not counted. Otherwise it
/// starts a new line, alone if it is too long.
pub fn wrap_words(text: &str, max_chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + word_len <= max_chars_per_line {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn fit_text(text: &str, options: &FitOptions) -> FittedText {
    let (truncated, cut_chars) = truncate_chars(text, options.max_chars);
    let mut lines = wrap_words(&truncated, options.max_chars_per_line);

    let cut_lines = lines.len() > options.max_lines;
    if cut_lines {
        lines.truncate(options.max_lines);
        if let Some(last) = lines.last_mut() {
            last.push(ELLIPSIS);
        }
    }

    FittedText {
        display_lines: lines,
        is_truncated: cut_chars || cut_lines,
        full_text: text.to_string(),
    }
}
