use std::borrow::Cow;
use std::collections::BTreeMap;

use regex::bytes::Regex;

/// Named values captured from a location's path by a classifier's file pattern.
pub type PathCaptures = BTreeMap<String, String>;

/// Placeholder value used to check that a template compiles before any path
/// capture is known.
const PROBE_VALUE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// An evidence pattern that may reference path captures as `{{name}}`.
///
/// Templates without variables are compiled once; templates with variables are
/// rendered per location with the regex-escaped captured values.
#[derive(Debug, Clone)]
pub(crate) struct EvidenceTemplate {
    segments: Vec<Segment>,
    compiled: Option<Regex>,
}

impl EvidenceTemplate {
    /// Parse and compile a template. Variables are validated by compiling the
    /// template with a literal placeholder in place of each one.
    pub(crate) fn compile(source: &str) -> Result<Self, regex::Error> {
        let segments = parse_segments(source);
        let has_variables = segments.iter().any(|s| matches!(s, Segment::Variable(_)));
        let probe = render(&segments, |_| Some(PROBE_VALUE.to_string()))
            .unwrap_or_else(|| source.to_string());
        let regex = Regex::new(&probe)?;
        let compiled = if has_variables { None } else { Some(regex) };
        Ok(Self { segments, compiled })
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Resolve the pattern for one location.
    ///
    /// Returns `Ok(None)` when a referenced capture did not participate in the
    /// path match, in which case the template cannot apply.
    pub(crate) fn pattern(
        &self,
        captures: &PathCaptures,
    ) -> Result<Option<Cow<'_, Regex>>, regex::Error> {
        if let Some(compiled) = &self.compiled {
            return Ok(Some(Cow::Borrowed(compiled)));
        }
        match render(&self.segments, |name| captures.get(name).map(|v| regex::escape(v))) {
            Some(rendered) => Regex::new(&rendered).map(|r| Some(Cow::Owned(r))),
            None => Ok(None),
        }
    }
}

fn render(segments: &[Segment], mut value: impl FnMut(&str) -> Option<String>) -> Option<String> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(name) => out.push_str(&value(name)?),
        }
    }
    Some(out)
}

/// Split a template into literal text and `{{ name }}` variables. Anything
/// between braces that is not a plain identifier stays literal, so ordinary
/// regex repetition syntax is untouched.
fn parse_segments(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else { break };
        let name = after_open[..end].trim().trim_start_matches('.');
        if is_identifier(name) {
            literal.push_str(&rest[..start]);
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Variable(name.to_string()));
            rest = &after_open[end + 2..];
        } else {
            literal.push_str(&rest[..start + 2]);
            rest = after_open;
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
