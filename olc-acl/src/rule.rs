use crate::error::{AclError, AclResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scope of a `dn.<scope>=` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DnScope {
    Base,
    Subtree,
}

impl DnScope {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Subtree => "subtree",
        }
    }
}

impl fmt::Display for DnScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnScope {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "subtree" => Ok(Self::Subtree),
            _ => Err(AclError::UnsupportedScope(s.to_string())),
        }
    }
}

/// Access granted by a by clause, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    None,
    Disclose,
    Auth,
    Compare,
    Read,
    Write,
    Manage,
}

impl AccessLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Disclose => "disclose",
            Self::Auth => "auth",
            Self::Compare => "compare",
            Self::Read => "read",
            Self::Write => "write",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "disclose" => Ok(Self::Disclose),
            "auth" => Ok(Self::Auth),
            "compare" => Ok(Self::Compare),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "manage" => Ok(Self::Manage),
            _ => Err(AclError::UnsupportedLevel(s.to_string())),
        }
    }
}

/// What happens after a by clause matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Stop evaluating (the default).
    Stop,
    /// Continue with the next rule.
    Break,
    /// Continue with the next by clause of this rule.
    Continue,
}

impl Control {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Break => "break",
            Self::Continue => "continue",
        }
    }

    /// The value a by clause stores: `stop` is the default and kept as `None`.
    #[must_use]
    pub fn non_default(self) -> Option<Self> {
        (self != Self::Stop).then_some(self)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Control {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop" => Ok(Self::Stop),
            "break" => Ok(Self::Break),
            "continue" => Ok(Self::Continue),
            _ => Err(AclError::UnsupportedControl(s.to_string())),
        }
    }
}

/// The `<who>` part of a by clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Subject {
    /// `*`
    Any,
    Anonymous,
    Users,
    /// `self`
    SelfEntry,
    Group(String),
    DnBase(String),
    DnSubtree(String),
}

impl Subject {
    /// The subject keyword as written in a rule.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Any => "*",
            Self::Anonymous => "anonymous",
            Self::Users => "users",
            Self::SelfEntry => "self",
            Self::Group(_) => "group",
            Self::DnBase(_) => "dn.base",
            Self::DnSubtree(_) => "dn.subtree",
        }
    }

    /// The DN attached to `group`/`dn.base`/`dn.subtree` subjects.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Group(v) | Self::DnBase(v) | Self::DnSubtree(v) => Some(v),
            Self::Any | Self::Anonymous | Self::Users | Self::SelfEntry => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())?;
        if let Some(value) = self.value() {
            write!(f, "=\"{}\"", escape_value(value))?;
        }
        Ok(())
    }
}

/// One `by <who> [<level>] [<control>]` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByClause {
    pub subject: Subject,
    pub level: Option<AccessLevel>,
    /// `None` is the default `stop`.
    pub control: Option<Control>,
}

impl ByClause {
    pub fn new(subject: Subject, level: Option<AccessLevel>) -> Self {
        Self {
            subject,
            level,
            control: None,
        }
    }

    #[must_use]
    pub fn with_control(mut self, control: Control) -> Self {
        self.control = control.non_default();
        self
    }
}

impl fmt::Display for ByClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "by {}", self.subject)?;
        if let Some(level) = self.level {
            write!(f, " {level}")?;
        }
        match self.control {
            Some(Control::Stop) | None => {}
            Some(control) => write!(f, " {control}")?,
        }
        Ok(())
    }
}

/// A parsed `olcAccess` rule.
///
/// A rule either matches every entry (`to *`) or narrows its target with a
/// DN, a filter and/or an attribute list. It always has at least one by
/// clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    matches_all: bool,
    dn_scope: Option<DnScope>,
    dn_value: Option<String>,
    filter: Option<String>,
    attributes: Option<String>,
    by_clauses: Vec<ByClause>,
}

impl AclRule {
    /// Creates a `to *` rule with the given by clauses.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::EmptyByList`] when `by_clauses` is empty.
    pub fn new(by_clauses: Vec<ByClause>) -> AclResult<Self> {
        if by_clauses.is_empty() {
            return Err(AclError::EmptyByList);
        }
        Ok(Self {
            matches_all: true,
            dn_scope: None,
            dn_value: None,
            filter: None,
            attributes: None,
            by_clauses,
        })
    }

    /// Parses a rule. Same as `s.parse::<AclRule>()`.
    pub fn parse(s: &str) -> AclResult<Self> {
        s.parse()
    }

    pub(crate) fn from_parts(
        matches_all: bool,
        dn: Option<(DnScope, String)>,
        filter: Option<String>,
        attributes: Option<String>,
        by_clauses: Vec<ByClause>,
    ) -> Self {
        let (dn_scope, dn_value) = match dn {
            Some((scope, value)) => (Some(scope), Some(value)),
            None => (None, None),
        };
        Self {
            matches_all,
            dn_scope,
            dn_value,
            filter,
            attributes,
            by_clauses,
        }
    }

    #[must_use]
    pub fn matches_all(&self) -> bool {
        self.matches_all
    }

    /// Makes the rule match every entry, or not. Matching everything drops
    /// the DN, filter and attribute restrictions.
    pub fn set_match_all(&mut self, all: bool) {
        self.matches_all = all;
        if all {
            self.dn_scope = None;
            self.dn_value = None;
            self.filter = None;
            self.attributes = None;
        }
    }

    #[must_use]
    pub fn dn_scope(&self) -> Option<DnScope> {
        self.dn_scope
    }

    #[must_use]
    pub fn dn_value(&self) -> Option<&str> {
        self.dn_value.as_deref()
    }

    pub fn set_dn(&mut self, scope: DnScope, value: impl Into<String>) {
        self.matches_all = false;
        self.dn_scope = Some(scope);
        self.dn_value = Some(value.into());
    }

    pub fn clear_dn(&mut self) {
        self.dn_scope = None;
        self.dn_value = None;
    }

    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn set_filter(&mut self, filter: Option<String>) {
        if filter.is_some() {
            self.matches_all = false;
        }
        self.filter = filter.filter(|f| !f.is_empty());
    }

    #[must_use]
    pub fn attributes(&self) -> Option<&str> {
        self.attributes.as_deref()
    }

    pub fn set_attributes(&mut self, attrs: Option<String>) {
        if attrs.is_some() {
            self.matches_all = false;
        }
        self.attributes = attrs.filter(|a| !a.is_empty());
    }

    #[must_use]
    pub fn by_clauses(&self) -> &[ByClause] {
        &self.by_clauses
    }

    /// Replaces the by clauses.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::EmptyByList`] when `by_clauses` is empty; the rule
    /// is left unchanged.
    pub fn set_by_clauses(&mut self, by_clauses: Vec<ByClause>) -> AclResult<()> {
        if by_clauses.is_empty() {
            return Err(AclError::EmptyByList);
        }
        self.by_clauses = by_clauses;
        Ok(())
    }

    pub fn push_by_clause(&mut self, clause: ByClause) {
        self.by_clauses.push(clause);
    }

    fn has_target(&self) -> bool {
        self.dn_scope.is_some() || self.filter.is_some() || self.attributes.is_some()
    }
}

impl fmt::Display for AclRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("to")?;
        if self.matches_all || !self.has_target() {
            f.write_str(" *")?;
        } else {
            if let Some(scope) = self.dn_scope {
                let value = self.dn_value.as_deref().unwrap_or_default();
                write!(f, " dn.{scope}=\"{}\"", escape_value(value))?;
            }
            if let Some(filter) = &self.filter {
                write!(f, " filter={}", quote_if_needed(filter))?;
            }
            if let Some(attrs) = &self.attributes {
                write!(f, " attrs={}", quote_if_needed(attrs))?;
            }
        }
        for clause in &self.by_clauses {
            write!(f, " {clause}")?;
        }
        Ok(())
    }
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.starts_with('"') || value.chars().any(char::is_whitespace) {
        format!("\"{}\"", escape_value(value))
    } else {
        value.to_string()
    }
}
