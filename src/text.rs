use regex::Regex;
use std::sync::OnceLock;
use time::{format_description, Date};

static SEQUEL: OnceLock<Regex> = OnceLock::new();

/// Lowercases and keeps only `[a-z0-9 ]`, so accented letters are dropped rather than folded.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Ratcliff/Obershelp ratio of the lowercased inputs.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Longest common block, earliest in `a` then in `b` on ties, as `(start_a, start_b, len)`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = previous[j] + 1;
                current[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        previous = current;
    }

    best
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }

    len + matched_chars(&a[..i], &b[..j]) + matched_chars(&a[i + len..], &b[j + len..])
}

/// Standalone roman numerals II to V or integers 1 to 10. Years are not sequels.
pub fn is_sequel(title: &str) -> bool {
    let sequel = SEQUEL.get_or_init(|| {
        Regex::new(r"\b(?:ii|iii|iv|v|[1-9]|10)\b").expect("sequel pattern is valid")
    });

    sequel.is_match(&title.to_lowercase())
}

pub fn sanitize_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(':', " ")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Converts the storefront's `25 Sep, 2025` into `2025-09-25`.
pub fn steam_date_to_iso(date: &str) -> Option<String> {
    let input = format_description::parse("[day padding:none] [month repr:short], [year]").ok()?;
    let output = format_description::parse("[year]-[month]-[day]").ok()?;

    let date = Date::parse(date.trim(), &input).ok()?;
    date.format(&output).ok()
}
