//! Display helpers for job listings.

use chrono::{DateTime, NaiveDateTime, Utc};

pub const DESCRIPTION_PREVIEW_CHARS: usize = 300;

/// Salary range in rupees, or `None` when neither bound is known.
/// A bound of zero counts as unknown.
pub fn format_salary(min: Option<f64>, max: Option<f64>) -> Option<String> {
    let known = |v: Option<f64>| v.filter(|v| *v > 0.0);
    match (known(min), known(max)) {
        (Some(min), Some(max)) => Some(format!("₹{} - ₹{}", group_digits(min), group_digits(max))),
        (Some(min), None) => Some(format!("₹{}+", group_digits(min))),
        (None, Some(max)) => Some(format!("Up to ₹{}", group_digits(max))),
        (None, None) => None,
    }
}

fn group_digits(value: f64) -> String {
    let digits = (value.round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// How long ago a posting was created, e.g. `"3 days ago"` or `"2 weeks ago"`.
/// Unparseable timestamps yield `None`.
pub fn posted_ago(created: &str, now: DateTime<Utc>) -> Option<String> {
    let created = parse_timestamp(created)?;
    let secs = (now - created).num_seconds().unsigned_abs();
    let days = secs.div_ceil(86_400);

    Some(match days {
        1 => "1 day ago".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d => format!("{} months ago", d / 30),
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Plain-text preview of an HTML description: tags stripped, whitespace
/// collapsed, cut to `max_chars` with a trailing `...`.
pub fn preview_description(description: &str, max_chars: usize) -> String {
    let text = strip_tags(description)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Removes `<...>` spans. A `<` with no closing `>` is kept as text.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
