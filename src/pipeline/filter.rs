//! Name and depth filters for the walk.
//!
//! A name pattern is one of:
//! - a delimited regex such as `/^IMG_\d+/i` or `#\.jpe?g$#` (flags `i`, `m`, `s`, `x`, `U`),
//! - a glob (`*`, `?`, `[...]`, `{a,b}`),
//! - a literal filename, which is a glob without wildcards and must match exactly.
//!
//! Patterns are matched against the entry's filename only.

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::Result;
use crate::error::SourceError;

/// One compiled `include`/`exclude` pattern.
#[derive(Clone, Debug)]
pub enum NamePattern {
    Glob(GlobMatcher),
    Regex(Regex),
}

impl NamePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if let Some((body, flags)) = split_delimited_regex(pattern) {
            let inline: String = flags.chars().filter(|c| "imsxU".contains(*c)).collect();
            let source = if inline.is_empty() {
                body.to_string()
            } else {
                format!("(?{inline}){body}")
            };
            let re = Regex::new(&source).map_err(|source| SourceError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            return Ok(NamePattern::Regex(re));
        }
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|source| SourceError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(NamePattern::Glob(glob.compile_matcher()))
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        match self {
            NamePattern::Glob(glob) => glob.is_match(file_name),
            NamePattern::Regex(re) => re.is_match(file_name),
        }
    }
}

/// Compiled set of name patterns. Matches if any pattern matches.
#[derive(Clone, Debug, Default)]
pub struct NameFilter {
    patterns: Vec<NamePattern>,
}

impl NameFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| NamePattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(file_name))
    }
}

/// `Some((body, flags))` when `pattern` is written as a delimited regex.
fn split_delimited_regex(pattern: &str) -> Option<(&str, &str)> {
    let start = pattern.chars().next()?;
    if start.is_alphanumeric() || start.is_whitespace() || matches!(start, '\\' | '*' | '?') {
        return None;
    }
    let end = match start {
        '{' => '}',
        '(' => ')',
        '[' => ']',
        '<' => '>',
        c => c,
    };
    let close = pattern.rfind(end)?;
    if close < 2 {
        return None;
    }
    let flags = &pattern[close + end.len_utf8()..];
    if !flags.chars().all(|c| "imsxuADU".contains(c)) {
        return None;
    }
    Some((&pattern[start.len_utf8()..close], flags))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DepthOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// One `<op> <n>` bound on walk depth. Depth 0 is the direct children of the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthBound {
    op: DepthOp,
    n: usize,
}

impl DepthBound {
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = || SourceError::InvalidDepth(expr.to_string());
        let s = expr.trim();
        let (op, rest) = [
            ("==", DepthOp::Eq),
            ("!=", DepthOp::Ne),
            ("<=", DepthOp::Le),
            (">=", DepthOp::Ge),
            ("<", DepthOp::Lt),
            (">", DepthOp::Gt),
        ]
        .into_iter()
        .find_map(|(tok, op)| s.strip_prefix(tok).map(|rest| (op, rest)))
        .unwrap_or((DepthOp::Eq, s));
        let rest = rest.trim();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let n = rest.parse().map_err(|_| invalid())?;
        Ok(Self { op, n })
    }

    pub fn accepts(&self, depth: usize) -> bool {
        match self.op {
            DepthOp::Eq => depth == self.n,
            DepthOp::Ne => depth != self.n,
            DepthOp::Lt => depth < self.n,
            DepthOp::Le => depth <= self.n,
            DepthOp::Gt => depth > self.n,
            DepthOp::Ge => depth >= self.n,
        }
    }

    /// Deepest depth this bound can accept, if bounded.
    fn upper(&self) -> Option<usize> {
        match self.op {
            DepthOp::Eq | DepthOp::Le => Some(self.n),
            DepthOp::Lt => Some(self.n.saturating_sub(1)),
            DepthOp::Ne | DepthOp::Gt | DepthOp::Ge => None,
        }
    }
}

/// Conjunction of depth bounds. Empty accepts everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthFilter {
    bounds: Vec<DepthBound>,
}

impl DepthFilter {
    pub fn new<S: AsRef<str>>(exprs: &[S]) -> Result<Self> {
        let bounds = exprs
            .iter()
            .map(|e| DepthBound::parse(e.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bounds })
    }

    /// Only direct children of the root.
    pub fn top_level() -> Self {
        Self {
            bounds: vec![DepthBound {
                op: DepthOp::Eq,
                n: 0,
            }],
        }
    }

    pub fn accepts(&self, depth: usize) -> bool {
        self.bounds.iter().all(|b| b.accepts(depth))
    }

    /// Deepest depth any entry can be accepted at; used to stop descending.
    pub fn max_depth(&self) -> Option<usize> {
        self.bounds.iter().filter_map(DepthBound::upper).min()
    }
}

