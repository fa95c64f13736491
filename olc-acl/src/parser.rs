//! Single-pass tokenizer and parser for ACL rules.

use crate::error::{AclError, AclResult};
use crate::rule::{AccessLevel, AclRule, ByClause, Control, DnScope, Subject};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::{debug, trace};

/// Cursor over one rule string.
///
/// All delimiters the grammar cares about are ASCII, so byte offsets found by
/// searching for them are always char boundaries.
pub(crate) struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_blanks(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    pub(crate) fn is_at_end(&mut self) -> bool {
        self.skip_blanks();
        self.pos >= self.src.len()
    }

    /// Skips leading blanks and returns the next token.
    ///
    /// With `quoted` set and the token opening with `"`, the token runs to
    /// the closing `"` and is returned without its quotes, escapes resolved.
    /// Otherwise it runs to the next blank. At the end of input an empty
    /// token is returned.
    pub(crate) fn extract_token(&mut self, quoted: bool) -> AclResult<Cow<'a, str>> {
        self.skip_blanks();
        self.read_value(quoted)
    }

    fn read_value(&mut self, quoted: bool) -> AclResult<Cow<'a, str>> {
        let rest = self.rest();
        if quoted && rest.starts_with('"') {
            return self.read_quoted(&rest[1..]);
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += end;
        Ok(Cow::Borrowed(&rest[..end]))
    }

    /// Reads the body of a quoted value up to its closing `"`.
    ///
    /// `\\` and `\"` stand for a literal backslash and quote; any other
    /// backslash is kept as written.
    fn read_quoted(&mut self, body: &'a str) -> AclResult<Cow<'a, str>> {
        let start = self.pos;
        let bytes = body.as_bytes();
        let mut unescaped: Option<String> = None;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    self.pos += i + 2;
                    return Ok(match unescaped {
                        Some(owned) => Cow::Owned(owned),
                        None => Cow::Borrowed(&body[..i]),
                    });
                }
                b'\\' if matches!(bytes.get(i + 1), Some(b'\\' | b'"')) => {
                    let owned = unescaped.get_or_insert_with(|| body[..i].to_string());
                    owned.push(char::from(bytes[i + 1]));
                    i += 2;
                }
                _ => {
                    let ch_len = body[i..].chars().next().map_or(1, char::len_utf8);
                    if let Some(owned) = unescaped.as_mut() {
                        owned.push_str(&body[i..i + ch_len]);
                    }
                    i += ch_len;
                }
            }
        }
        Err(AclError::UnterminatedQuote(start))
    }

    /// Returns the next unquoted token without consuming it.
    fn peek_token(&self) -> &'a str {
        let rest = self.rest().trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        &rest[..end]
    }

    /// Reads a clause key up to `=` or a blank. Returns the key and whether
    /// an `=` followed it (the `=` is consumed).
    fn read_key(&mut self) -> (&'a str, bool) {
        self.skip_blanks();
        let rest = self.rest();
        let end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..end];
        let has_eq = rest[end..].starts_with('=');
        self.pos += end + usize::from(has_eq);
        (key, has_eq)
    }

    /// Reads the value right after a `key=`. Blanks are not skipped: the
    /// value must follow the `=` immediately.
    fn read_required_value(&mut self, key: &str) -> AclResult<String> {
        let value = self.read_value(true)?;
        if value.is_empty() {
            return Err(AclError::MissingValue(key.to_string()));
        }
        Ok(value.into_owned())
    }
}

impl FromStr for AclRule {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(after_to) = s.strip_prefix("to") else {
            return Err(AclError::MissingTo);
        };
        if after_to.starts_with(|c: char| !c.is_whitespace()) {
            return Err(AclError::MissingTo);
        }
        let mut tok = Tokenizer::new(s);
        tok.pos = 2;

        let mut matches_all = false;
        let mut dn = None;
        let mut filter = None;
        let mut attributes = None;

        if tok.peek_token() == "*" {
            debug!("acl matches all entries");
            tok.extract_token(false)?;
            matches_all = true;
            let next = tok.extract_token(false)?;
            if next.is_empty() {
                return Err(AclError::UnexpectedEnd("\"by\""));
            }
            if next != "by" {
                return Err(AclError::UnexpectedToken(next.into_owned()));
            }
        } else {
            let mut clauses = 0;
            loop {
                if tok.is_at_end() {
                    return Err(AclError::UnexpectedEnd("\"by\""));
                }
                let (key, has_eq) = tok.read_key();
                if key == "by" && !has_eq {
                    break;
                }
                if !has_eq {
                    return Err(AclError::MissingEquals(key.to_string()));
                }
                let value = tok.read_required_value(key)?;
                trace!("what clause {}={}", key, value);
                match key {
                    "filter" => filter = Some(value),
                    "attrs" => attributes = Some(value),
                    "dn.base" => dn = Some((DnScope::Base, value)),
                    "dn.subtree" => dn = Some((DnScope::Subtree, value)),
                    other => return Err(AclError::UnsupportedWhat(other.to_string())),
                }
                clauses += 1;
            }
            if clauses == 0 {
                return Err(AclError::EmptyTarget);
            }
        }

        let mut by_clauses = Vec::new();
        loop {
            by_clauses.push(parse_by_clause(&mut tok)?);
            let next = tok.extract_token(false)?;
            if next.is_empty() {
                break;
            }
            if next != "by" {
                return Err(AclError::UnexpectedToken(next.into_owned()));
            }
        }

        Ok(AclRule::from_parts(
            matches_all,
            dn,
            filter,
            attributes,
            by_clauses,
        ))
    }
}

/// Parses `<who> [<level>] [<control>]`; the leading `by` is already consumed.
fn parse_by_clause(tok: &mut Tokenizer<'_>) -> AclResult<ByClause> {
    if tok.is_at_end() {
        return Err(AclError::UnexpectedEnd("\"by\" subject"));
    }
    let (key, has_eq) = tok.read_key();
    let subject = match key {
        "*" | "anonymous" | "users" | "self" => {
            if has_eq {
                return Err(AclError::UnexpectedValue(key.to_string()));
            }
            match key {
                "*" => Subject::Any,
                "anonymous" => Subject::Anonymous,
                "users" => Subject::Users,
                _ => Subject::SelfEntry,
            }
        }
        "group" | "dn.base" | "dn.subtree" => {
            if !has_eq {
                return Err(AclError::MissingEquals(key.to_string()));
            }
            let value = tok.read_required_value(key)?;
            match key {
                "group" => Subject::Group(value),
                "dn.base" => Subject::DnBase(value),
                _ => Subject::DnSubtree(value),
            }
        }
        other => return Err(AclError::UnsupportedSubject(other.to_string())),
    };

    let mut level = None;
    let mut control = None;
    let slot = tok.peek_token();
    if !slot.is_empty() && slot != "by" {
        tok.extract_token(false)?;
        match slot.parse::<AccessLevel>() {
            Ok(l) => {
                level = Some(l);
                if let Ok(c) = tok.peek_token().parse::<Control>() {
                    tok.extract_token(false)?;
                    control = c.non_default();
                }
            }
            Err(err) => match slot.parse::<Control>() {
                Ok(c) => control = c.non_default(),
                Err(_) => return Err(err),
            },
        }
    }
    debug!(
        "by clause: subject <{}> level <{:?}> control <{:?}>",
        subject, level, control
    );
    Ok(ByClause {
        subject,
        level,
        control,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_plain_token() {
        let mut tok = Tokenizer::new("  read  write");
        assert_eq!(tok.extract_token(false).unwrap(), "read");
        assert_eq!(tok.extract_token(false).unwrap(), "write");
        assert_eq!(tok.extract_token(false).unwrap(), "");
        assert!(tok.is_at_end());
    }

    #[test]
    fn extract_quoted_token_strips_quotes() {
        let mut tok = Tokenizer::new(" \"cn=a b,dc=x\" rest");
        assert_eq!(tok.extract_token(true).unwrap(), "cn=a b,dc=x");
        assert_eq!(tok.extract_token(false).unwrap(), "rest");
    }

    #[test]
    fn extract_quoted_token_skips_escaped_quotes() {
        let mut tok = Tokenizer::new(r#""say \"hi\"" next"#);
        assert_eq!(tok.extract_token(true).unwrap(), r#"say "hi""#);
        assert_eq!(tok.extract_token(false).unwrap(), "next");
    }

    #[test]
    fn extract_quote_without_quoted_flag_is_plain() {
        let mut tok = Tokenizer::new("\"a b\"");
        assert_eq!(tok.extract_token(false).unwrap(), "\"a");
    }

    #[test]
    fn extract_unterminated_quote_fails() {
        let mut tok = Tokenizer::new("x \"open");
        tok.extract_token(false).unwrap();
        assert_eq!(tok.extract_token(true), Err(AclError::UnterminatedQuote(2)));
    }

    #[test]
    fn read_key_consumes_equals() {
        let mut tok = Tokenizer::new("dn.base=\"x\"");
        assert_eq!(tok.read_key(), ("dn.base", true));
        assert_eq!(tok.read_required_value("dn.base").unwrap(), "x");
    }

    #[test]
    fn read_key_without_equals() {
        let mut tok = Tokenizer::new("users read");
        assert_eq!(tok.read_key(), ("users", false));
        assert_eq!(tok.peek_token(), "read");
    }
}
