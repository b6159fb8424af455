use std::sync::LazyLock;

use regex::Regex;

/// ANSI SGR sequences (`ESC [ <params> m`) that color/format terminal text.
static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("invalid SGR regex"));

static FPS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Running at\s*([\d,\.]+)\s*FPS").expect("invalid FPS regex"));

/// Remove ANSI color/formatting sequences so number parsing sees plain text.
pub fn strip_ansi(text: &str) -> String {
    ANSI_SGR.replace_all(text, "").into_owned()
}

/// Value of the last `Running at <number> FPS` occurrence in `text`.
///
/// Grouping commas are stripped before parsing. Returns `None` when no line
/// matches at all; a matched but unparseable numeral reads as `0.0`.
pub fn last_fps(text: &str) -> Option<f64> {
    let caps = FPS_LINE.captures_iter(text).last()?;
    let raw = caps[1].replace(',', "");
    Some(raw.parse::<f64>().unwrap_or(0.0))
}

/// Format `value` with two decimals and comma-grouped integer digits.
pub fn group_thousands(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (int_part, frac) = match formatted.split_once('.') {
        Some(parts) => parts,
        None => (formatted.as_str(), "00"),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}
