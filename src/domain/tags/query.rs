//! Boolean tag filters for record listings
//!
//! Precedence is NOT > AND > OR; parentheses group explicitly.
//!
//! ```
//! use lifeos::domain::tags::TagQuery;
//!
//! let query = TagQuery::parse("errands AND NOT someday").unwrap();
//! assert!(query.matches(&["errands".to_string()]));
//! assert!(!query.matches(&["errands".to_string(), "someday".to_string()]));
//! ```

use crate::error::{LifeosError, Result};
use std::collections::HashSet;
use std::fmt;

/// Parsed tag filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQuery {
    Tag(String),
    And(Box<TagQuery>, Box<TagQuery>),
    Or(Box<TagQuery>, Box<TagQuery>),
    Not(Box<TagQuery>),
}

impl TagQuery {
    pub fn parse(query: &str) -> Result<Self> {
        let tokens = tokenize(query)?;
        let mut parser = Parser { tokens, pos: 0 };
        let parsed = parser.or_expr()?;

        if let Some(token) = parser.peek() {
            return Err(LifeosError::InvalidQuery(format!(
                "unexpected {} at position {}",
                token, parser.pos
            )));
        }

        Ok(parsed)
    }

    /// Evaluate against a record's (already normalized) tags
    pub fn matches(&self, tags: &[String]) -> bool {
        let set: HashSet<&str> = tags.iter().map(String::as_str).collect();
        self.eval(&set)
    }

    fn eval(&self, tags: &HashSet<&str>) -> bool {
        match self {
            TagQuery::Tag(tag) => tags.contains(tag.as_str()),
            TagQuery::And(l, r) => l.eval(tags) && r.eval(tags),
            TagQuery::Or(l, r) => l.eval(tags) || r.eval(tags),
            TagQuery::Not(inner) => !inner.eval(tags),
        }
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagQuery::Tag(tag) => write!(f, "#{}", tag),
            TagQuery::And(l, r) => write!(f, "{} AND {}", l, r),
            TagQuery::Or(l, r) => write!(f, "({} OR {})", l, r),
            TagQuery::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Tag(String),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Tag(tag) => write!(f, "tag '{}'", tag),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("NOT"),
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
        }
    }
}

fn tokenize(query: &str) -> Result<Vec<Token>> {
    let spaced = query.replace('(', " ( ").replace(')', " ) ");
    let mut tokens = Vec::new();

    for word in spaced.split_whitespace() {
        let token = match word.to_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "(" => Token::Open,
            ")" => Token::Close,
            _ => {
                let tag = word.strip_prefix('#').unwrap_or(word);
                if tag.is_empty()
                    || !tag
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
                {
                    return Err(LifeosError::InvalidQuery(format!("invalid tag '{}'", word)));
                }
                Token::Tag(tag.to_lowercase())
            }
        };
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(LifeosError::InvalidQuery("empty query".to_string()));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<TagQuery> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::Or) {
            let right = self.and_expr()?;
            left = TagQuery::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<TagQuery> {
        let mut left = self.not_expr()?;
        while self.eat(&Token::And) {
            let right = self.not_expr()?;
            left = TagQuery::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<TagQuery> {
        if self.eat(&Token::Not) {
            let inner = self.not_expr()?;
            return Ok(TagQuery::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<TagQuery> {
        match self.peek().cloned() {
            Some(Token::Tag(tag)) => {
                self.pos += 1;
                Ok(TagQuery::Tag(tag))
            }
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.or_expr()?;
                if !self.eat(&Token::Close) {
                    return Err(LifeosError::InvalidQuery("missing ')'".to_string()));
                }
                Ok(inner)
            }
            Some(other) => Err(LifeosError::InvalidQuery(format!(
                "expected tag, found {}",
                other
            ))),
            None => Err(LifeosError::InvalidQuery(
                "unexpected end of query".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn tag(name: &str) -> Box<TagQuery> {
        Box::new(TagQuery::Tag(name.to_string()))
    }

    #[test]
    fn test_parse_single_tag_strips_hash_and_case() {
        assert_eq!(TagQuery::parse("#Work").unwrap(), *tag("work"));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let query = TagQuery::parse("work AND urgent OR personal").unwrap();
        assert_eq!(
            query,
            TagQuery::Or(Box::new(TagQuery::And(tag("work"), tag("urgent"))), tag("personal"))
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let query = TagQuery::parse("work AND (urgent OR personal)").unwrap();
        assert_eq!(
            query,
            TagQuery::And(tag("work"), Box::new(TagQuery::Or(tag("urgent"), tag("personal"))))
        );
        assert!(query.matches(&tags(&["work", "personal"])));
        assert!(!query.matches(&tags(&["personal"])));
    }

    #[test]
    fn test_not_excludes() {
        let query = TagQuery::parse("work and not meeting").unwrap();
        assert!(query.matches(&tags(&["work"])));
        assert!(!query.matches(&tags(&["work", "meeting"])));
        assert!(!query.matches(&tags(&[])));
    }

    #[test]
    fn test_double_not() {
        let query = TagQuery::parse("NOT NOT work").unwrap();
        assert!(query.matches(&tags(&["work"])));
    }

    #[test]
    fn test_rejects_malformed_queries() {
        for bad in ["", "   ", "work@home", "work AND", "(work", "work)", "AND work", "#"] {
            assert!(
                matches!(TagQuery::parse(bad), Err(LifeosError::InvalidQuery(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display() {
        let query = TagQuery::parse("a AND NOT b OR c").unwrap();
        assert_eq!(query.to_string(), "(#a AND NOT #b OR #c)");
    }
}
