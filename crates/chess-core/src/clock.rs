//! `[%clk]` / `[%eval]` comment commands from the unnormalized game text.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Evaluation;

static CLK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[%clk\s+([0-9:.]+)\s*\]").unwrap());
static EVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[%eval\s+([#+\-0-9.]+)[^\]]*\]").unwrap());

/// Clock and evaluation recorded after one ply.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlyAnnotation {
    pub clock_seconds: Option<f64>,
    pub eval: Option<Evaluation>,
}

/// `H:MM:SS` or `M:SS`, fractional seconds allowed.
pub fn parse_clock(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let nums: Option<Vec<f64>> = parts.iter().map(|p| p.parse::<f64>().ok()).collect();
    match nums?.as_slice() {
        [h, m, s] => Some(h * 3600.0 + m * 60.0 + s),
        [m, s] => Some(m * 60.0 + s),
        _ => None,
    }
}

/// `0.35`, `-1.2` or `#-3`.
pub fn parse_eval(text: &str) -> Option<Evaluation> {
    let text = text.trim();
    if let Some(mate) = text.strip_prefix('#') {
        return mate.trim_start_matches('+').parse().ok().map(Evaluation::Mate);
    }
    text.parse().ok().map(Evaluation::Pawns)
}

fn is_move_token(token: &str) -> bool {
    if matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*") {
        return false;
    }
    let body = token.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
    !body.is_empty() && !body.starts_with('$')
}

fn flush(token: &mut String, plies: &mut Vec<PlyAnnotation>) {
    if is_move_token(token) {
        plies.push(PlyAnnotation::default());
    }
    token.clear();
}

/// One entry per mainline ply, in order. Variations are skipped and header
/// lines are ignored; the commands found in a comment belong to the ply
/// immediately before it.
pub fn extract_annotations(raw: &str) -> Vec<PlyAnnotation> {
    let mut plies: Vec<PlyAnnotation> = Vec::new();
    let mut depth = 0usize;
    let mut token = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                flush(&mut token, &mut plies);
                let mut comment = String::new();
                for inner in chars.by_ref() {
                    if inner == '}' {
                        break;
                    }
                    comment.push(inner);
                }
                if depth == 0 {
                    if let Some(last) = plies.last_mut() {
                        apply_comment(last, &comment);
                    }
                }
            }
            ';' => {
                flush(&mut token, &mut plies);
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '[' if depth == 0 && token.is_empty() => {
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                }
            }
            '(' => {
                flush(&mut token, &mut plies);
                depth += 1;
            }
            ')' => {
                token.clear();
                depth = depth.saturating_sub(1);
            }
            c if c.is_whitespace() => {
                if depth == 0 {
                    flush(&mut token, &mut plies);
                } else {
                    token.clear();
                }
            }
            c => {
                if depth == 0 {
                    token.push(c);
                }
            }
        }
    }
    flush(&mut token, &mut plies);
    plies
}

fn apply_comment(ply: &mut PlyAnnotation, comment: &str) {
    if let Some(cap) = CLK_RE.captures(comment) {
        ply.clock_seconds = parse_clock(&cap[1]);
    }
    if let Some(cap) = EVAL_RE.captures(comment) {
        ply.eval = parse_eval(&cap[1]);
    }
}
