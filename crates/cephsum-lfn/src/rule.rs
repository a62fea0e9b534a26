use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// Protocol label of rules that apply whatever protocol was requested.
pub const DIRECT: &str = "direct";

/// Uncompiled rule, as written in a config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSpec {
    pub protocol: String,
    pub path_match: String,
    pub result: String,
    #[serde(default)]
    pub chain: Option<String>,
}

/// One compiled lfn-to-pfn rule.
///
/// The pattern must match the whole input. Result templates refer to
/// capture groups as `$1`..`$9` or `${n}`; `$$` is a literal dollar.
#[derive(Clone, Debug)]
pub struct PathRule {
    protocol: String,
    path_match: String,
    pattern: Regex,
    result: String,
    chain: Option<String>,
}

impl PathRule {
    pub fn new(
        protocol: impl Into<String>,
        path_match: impl Into<String>,
        result: impl Into<String>,
        chain: Option<String>,
    ) -> ResolveResult<Self> {
        let path_match = path_match.into();
        let pattern = Regex::new(&format!("^(?:{path_match})$")).map_err(|source| {
            ResolveError::InvalidPattern {
                pattern: path_match.clone(),
                source,
            }
        })?;
        Ok(Self {
            protocol: protocol.into(),
            path_match,
            pattern,
            result: result.into(),
            chain: chain.filter(|c| !c.is_empty()),
        })
    }

    pub fn from_spec(spec: &RuleSpec) -> ResolveResult<Self> {
        Self::new(
            spec.protocol.clone(),
            spec.path_match.clone(),
            spec.result.clone(),
            spec.chain.clone(),
        )
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn path_match(&self) -> &str {
        &self.path_match
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    /// Protocol whose resolution feeds this rule, if chained.
    pub fn chain(&self) -> Option<&str> {
        self.chain.as_deref()
    }

    /// Whether this rule takes part in resolving for `protocol`.
    pub fn applies_to(&self, protocol: &str) -> bool {
        self.protocol == protocol || self.protocol == DIRECT
    }

    /// Match `input` and expand the result template, or `None`.
    pub fn apply(&self, input: &str) -> Option<String> {
        let caps = self.pattern.captures(input)?;
        Some(expand(&self.result, |n| {
            caps.get(n).map(|m| m.as_str()).unwrap_or("")
        }))
    }
}

fn expand<'a>(template: &str, group: impl Fn(usize) -> &'a str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(d) = tail.chars().next().and_then(|c| c.to_digit(10)) {
            out.push_str(group(d as usize));
            rest = &tail[1..];
        } else if let Some((n, after)) = braced_group(tail) {
            out.push_str(group(n));
            rest = after;
        } else {
            out.push('$');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Parse `{n}` at the start of `s`, returning `n` and what follows.
fn braced_group(s: &str) -> Option<(usize, &str)> {
    let inner = s.strip_prefix('{')?;
    let end = inner.find('}')?;
    let n = inner[..end].parse().ok()?;
    Some((n, &inner[end + 1..]))
}
