//! Route pattern parsing and matching.
//!
//! A pattern is a URL template such as `/data/{id:[0-9]+}`. Placeholders are
//! `{name}` or `{name:regex}`; without a regex a placeholder matches one path
//! segment. Trailing optional groups (`/users[/{id}[/{tab}]]`) expand into one
//! alternative per nesting level.

mod parser;

use crate::error::{Error, Result};

use std::fmt;

use regex::Regex;
use smallvec::SmallVec;

pub use self::parser::DEFAULT_PARAM_REGEX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: Box<str>, regex: Box<str> },
}

/// One concrete decomposition of a pattern with its compiled matcher.
#[derive(Debug, Clone)]
pub struct Alternative {
    segments: Vec<Segment>,
    matcher: Regex,
}

#[derive(Debug, Clone)]
pub struct ParsedPattern {
    source: Box<str>,
    alternatives: Vec<Alternative>,
}

/// Captured values of a successful match, aligned with the parameters of
/// the matching alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub alternative: usize,
    pub values: SmallVec<[String; 4]>,
}

pub fn parse(pattern: &str) -> Result<ParsedPattern> {
    let syntax = |reason: String| Error::PatternSyntax {
        pattern: pattern.to_owned(),
        reason,
    };

    let expanded = parser::split_optionals(pattern).map_err(|e| syntax(e.to_owned()))?;

    let mut alternatives = Vec::with_capacity(expanded.len());
    for alt in &expanded {
        let segments = parser::split_segments(alt).map_err(syntax)?;
        let matcher = build_match_regex(&segments).map_err(|e| syntax(e.to_string()))?;
        alternatives.push(Alternative { segments, matcher });
    }

    Ok(ParsedPattern {
        source: pattern.into(),
        alternatives,
    })
}

/// Builds the anchored matcher for one alternative.
///
/// Literals are escaped and match verbatim. Every parameter becomes the named
/// group `p{index}`, so groups inside the parameter's own regex do not disturb
/// the positional order of captures.
pub fn build_match_regex(segments: &[Segment]) -> Result<Regex, regex::Error> {
    let mut re = String::with_capacity(64);
    re.push('^');
    let mut index = 0usize;
    for seg in segments {
        match seg {
            Segment::Literal(text) => re.push_str(&regex::escape(text)),
            Segment::Param { regex, .. } => {
                re.push_str(&format!("(?P<p{}>{})", index, regex));
                index += 1;
            }
        }
    }
    re.push('$');
    Regex::new(&re)
}

/// Drops the query string.
pub fn sanitize_url(url: &str) -> &str {
    match url.find('?') {
        Some(pos) => &url[..pos],
        None => url,
    }
}

impl ParsedPattern {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn is_match(&self, url: &str) -> bool {
        let path = sanitize_url(url);
        self.alternatives.iter().any(|alt| alt.matcher.is_match(path))
    }

    /// Tries every alternative in order; the first that matches wins.
    pub fn match_url(&self, url: &str) -> Option<RouteMatch> {
        let path = sanitize_url(url);
        self.alternatives.iter().enumerate().find_map(|(i, alt)| {
            alt.captures(path).map(|values| RouteMatch {
                alternative: i,
                values,
            })
        })
    }
}

impl Alternative {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Param { name, .. } => Some(&**name),
            Segment::Literal(_) => None,
        })
    }

    fn captures(&self, path: &str) -> Option<SmallVec<[String; 4]>> {
        let caps = self.matcher.captures(path)?;
        let count = self.param_names().count();
        let mut values = SmallVec::with_capacity(count);
        for i in 0..count {
            let value = caps.name(&format!("p{}", i)).map_or("", |m| m.as_str());
            values.push(value.to_owned());
        }
        Some(values)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param { name, regex } => write!(f, "{{{}:{}}}", name, regex),
        }
    }
}
