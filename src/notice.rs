//! This module recovers the human-readable `@notice` documentation of a
//! contract's functions.
//!
//! The syntax tree does not retain comments, so this is a heuristic scan over
//! the raw source text. Each declaration span runs from a `@notice` tag or a
//! line starting with `function` up to the next `{`, and the signature found in
//! the span is canonicalised exactly as the extractor does so that the two can
//! be joined by string comparison.
//!
//! The scan is best-effort: a declaration whose header mentions `internal`,
//! `private`, `view`, `pure` or `constant` is skipped. Only the last `@notice` in a span is considered, and only when the
//! comment holding it is directly followed by the function declaration.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{constant::EXCLUDING_KEYWORDS, signature, surface::ContractFunction};

/// The data locations and other keywords that may sit between a parameter's
/// type and its name.
const PARAMETER_KEYWORDS: [&str; 5] = ["memory", "calldata", "storage", "payable", "indexed"];

/// A signature recovered from the source along with its notice.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeEntry {
    /// The canonical signature of the declared function.
    pub signature: String,

    /// The notice text, whitespace-normalised, or `None` if the declaration
    /// has no `@notice` tag.
    pub notice: Option<String>,

    /// The declared names of the parameters, empty where a parameter is
    /// unnamed.
    pub parameter_names: Vec<String>,
}

fn declaration_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?ms)(@notice|^\s*function\b).*?\{")
            .expect("The declaration pattern is a valid regex")
    })
}

fn excluded_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        let pattern = format!(r"\b({})\b", EXCLUDING_KEYWORDS.join("|"));
        Regex::new(&pattern).expect("The keyword pattern is a valid regex")
    })
}

fn header_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*function\b").expect("The header pattern is a valid regex")
    })
}

fn function_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\bfunction\b\s*([A-Za-z_$][A-Za-z0-9_$]*)?\s*\(([^)]*)\)")
            .expect("The function pattern is a valid regex")
    })
}

fn comment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("The comment pattern is a valid regex")
    })
}

fn array_suffix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\s*(\[[^\]]*\])").expect("The array suffix pattern is a valid regex")
    })
}

fn notice_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)@notice\b(.*?)(?:\*/|\s@\w|(?m:^)\s*function\b)")
            .expect("The notice pattern is a valid regex")
    })
}

/// Scans `source` for the public, state-changing function declarations and
/// their notices.
#[must_use]
pub fn extract_notices(source: &str) -> Vec<NoticeEntry> {
    declaration_regex()
        .find_iter(source)
        .map(|span| span.as_str())
        .filter_map(|span| {
            let header = &span[header_start(span)?..];
            if excluded_regex().is_match(header) {
                return None;
            }
            let captures = function_regex().captures(header)?;
            let name = captures.get(1).map(|m| m.as_str());
            let parameters = captures.get(2).map_or("", |m| m.as_str());
            let (types, parameter_names) = split_parameters(parameters);

            Some(NoticeEntry {
                signature: signature::render(name, &types),
                notice: notice_text(span),
                parameter_names,
            })
        })
        .collect()
}

/// Finds where the function declaration in `span` begins: the last line that
/// starts with `function`, or the first `function` keyword otherwise.
fn header_start(span: &str) -> Option<usize> {
    header_regex()
        .find_iter(span)
        .last()
        .or_else(|| function_regex().find(span))
        .map(|m| m.start())
}

/// Returns copies of the `functions` with the notice of the first entry that
/// has the same signature attached, or no notice if none matches.
#[must_use]
pub fn attach_notices(functions: &[ContractFunction], entries: &[NoticeEntry]) -> Vec<ContractFunction> {
    functions
        .iter()
        .map(|function| {
            let notice = entries
                .iter()
                .find(|entry| entry.signature == function.signature())
                .and_then(|entry| entry.notice.clone());
            function.with_notice(notice)
        })
        .collect()
}

/// Splits a textual parameter list into canonical types and parameter names.
///
/// Comments are dropped, and array suffixes are joined to their base type.
fn split_parameters(parameters: &str) -> (Vec<String>, Vec<String>) {
    let parameters = comment_regex().replace_all(parameters, " ");
    parameters
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|parameter| {
            let parameter = array_suffix_regex().replace_all(parameter, |caps: &Captures| {
                caps[1].split_whitespace().collect::<String>()
            });
            let mut tokens = parameter.split_whitespace();
            let ty = signature::canonical_type(tokens.next().unwrap_or_default());
            let name = tokens
                .find(|token| !PARAMETER_KEYWORDS.contains(token))
                .unwrap_or_default()
                .to_string();
            (ty, name)
        })
        .unzip()
}

/// Extracts the text of the last `@notice` tag in `span`, with comment
/// punctuation removed and whitespace collapsed to single spaces.
///
/// A notice whose comment is followed by anything other than the function
/// declaration belongs to some other declaration, and is ignored.
fn notice_text(span: &str) -> Option<String> {
    let start = span.rfind("@notice")?;
    if !precedes_function(span, start) {
        return None;
    }

    let captures = notice_regex().captures(&span[start..])?;
    let raw = captures.get(1).map_or("", |m| m.as_str());
    let text = raw
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line
                .strip_prefix("///")
                .or_else(|| line.strip_prefix("//"))
                .or_else(|| line.strip_prefix("/**"))
                .or_else(|| line.strip_prefix('*'))
                .unwrap_or(line);
            line.trim()
        })
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    Some(text)
}

/// Checks that the comment holding the tag at `start` in `span` is directly
/// followed by a `function` keyword.
fn precedes_function(span: &str, start: usize) -> bool {
    let line_start = span[..start].rfind('\n').map_or(0, |i| i + 1);
    let tail = &span[start..];

    let rest = if span[line_start..start].trim_start().starts_with("//") {
        // A run of line comments ends at the first line holding anything else.
        let mut offset = tail.find('\n').map_or(tail.len(), |i| i + 1);
        for line in tail[offset..].split_inclusive('\n') {
            let content = line.trim();
            if !content.is_empty() && !content.starts_with("//") {
                break;
            }
            offset += line.len();
        }
        &tail[offset..]
    } else {
        match tail.find("*/") {
            Some(end) => &tail[end + 2..],
            None => return false,
        }
    };

    rest.trim_start().strip_prefix("function").is_some_and(|after| {
        !after.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$')
    })
}
