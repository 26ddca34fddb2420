//! npm-style version range satisfaction.
//!
//! Ranges are translated into [`semver::VersionReq`] sets:
//!
//! - `""`, `*`, `x`, `latest` match any release
//! - `a || b` matches when any alternative matches
//! - `a - b` is `>=a, <=b`
//! - whitespace-separated comparators must all match
//! - a bare version is exact (`1.2.3` means `=1.2.3`, `1.2` means `1.2.x`)
//! - trailing `x`/`X`/`*` segments are wildcards; an all-wildcard version
//!   (`x.x.x`, `*.*`) matches any release, also as a hyphen bound
//!
//! Anything that does not parse (git URLs, tags, aliases) never satisfies.

use semver::{Version, VersionReq};

/// Whether `version` satisfies `range`.
pub fn satisfies(version: &str, range: &str) -> bool {
    let Ok(version) = Version::parse(strip_v(version.trim())) else {
        return false;
    };

    range
        .split("||")
        .filter_map(alternative_to_req)
        .any(|req| req.matches(&version))
}

fn alternative_to_req(alternative: &str) -> Option<VersionReq> {
    let alternative = alternative.trim();
    if is_any(alternative) || alternative == "latest" {
        return Some(VersionReq::STAR);
    }

    let comparators = match alternative.split_once(" - ") {
        Some((low, high)) => vec![
            bound(">=", strip_v(low.trim())),
            bound("<=", strip_v(high.trim())),
        ],
        None => tokenize(alternative)
            .into_iter()
            .map(|c| normalize_comparator(&c))
            .collect::<Option<Vec<_>>>()?,
    };

    let comparators: Vec<_> = comparators.into_iter().filter(|c| c != "*").collect();
    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }
    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Split on whitespace, re-attaching operators written apart (`>= 1.2.0`).
fn tokenize(alternative: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;

    for part in alternative.split_whitespace() {
        if part.chars().all(|c| "<>=~^".contains(c)) {
            pending_op = Some(part);
            continue;
        }
        match pending_op.take() {
            Some(op) => tokens.push(format!("{}{}", op, part)),
            None => tokens.push(part.to_string()),
        }
    }

    tokens
}

fn normalize_comparator(comparator: &str) -> Option<String> {
    let split = comparator
        .find(|c: char| !"<>=~^".contains(c))
        .unwrap_or(comparator.len());
    let (op, version) = comparator.split_at(split);
    let version = strip_v(version);

    match wildcard_free(version) {
        // Nothing is strictly above or below every version.
        None if op == "<" || op == ">" => None,
        None => Some("*".to_string()),
        // npm treats a bare version as exact; semver treats it as caret.
        Some(version) => {
            let op = if op.is_empty() { "=" } else { op };
            Some(format!("{}{}", op, version))
        }
    }
}

/// A hyphen range bound; a wildcard bound leaves that side open.
fn bound(op: &str, version: &str) -> String {
    match wildcard_free(version) {
        Some(version) => format!("{}{}", op, version),
        None => "*".to_string(),
    }
}

/// Drop trailing wildcard segments: `1.2.x` becomes `1.2`. `None` when
/// nothing but wildcards is left.
fn wildcard_free(version: &str) -> Option<&str> {
    let mut end = version.len();
    let mut rest = version;
    while let Some((head, last)) = rest.rsplit_once('.') {
        if !is_any(last) {
            break;
        }
        end = head.len();
        rest = head;
    }
    let trimmed = &version[..end];
    if trimmed.is_empty() || is_any(trimmed) {
        None
    } else {
        Some(trimmed)
    }
}

fn is_any(part: &str) -> bool {
    part.is_empty() || matches!(part, "*" | "x" | "X")
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('='))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version)
}
