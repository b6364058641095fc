//! Typed selection sets for the partial queries.
//!
//! Field names are validated against the GraphQL `Name` grammar when they
//! enter a [`Selection`], so a rendered selection can only ever contain
//! names, spaces and braces.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid GraphQL field name: {0:?}")]
    InvalidField(String),
    #[error("selection set is empty")]
    Empty,
    #[error("unbalanced braces in selection")]
    Unbalanced,
    #[error("selection nests deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// Deepest nesting `parse_fields` accepts.
pub const MAX_DEPTH: usize = 32;

fn is_name(s: &str) -> bool {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE.get_or_init(|| {
        Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("static regex is valid")
    });
    re.is_match(s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Field(String),
    Nested(String, Selection),
}

/// An ordered, validated GraphQL selection set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<Item>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str) -> Result<Self, SelectionError> {
        if !is_name(name) {
            return Err(SelectionError::InvalidField(name.to_string()));
        }
        self.items.push(Item::Field(name.to_string()));
        Ok(self)
    }

    pub fn fields<'a>(
        self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, SelectionError> {
        names.into_iter().try_fold(self, Self::field)
    }

    pub fn nested(mut self, name: &str, sub: Selection) -> Result<Self, SelectionError> {
        if !is_name(name) {
            return Err(SelectionError::InvalidField(name.to_string()));
        }
        if sub.is_empty() {
            return Err(SelectionError::Empty);
        }
        self.items.push(Item::Nested(name.to_string(), sub));
        Ok(self)
    }

    /// Parse the textual form (`"id name crewMembers { edges { node { id } } }"`).
    ///
    /// Commas count as whitespace, as in GraphQL. Arguments, aliases,
    /// directives and fragments are rejected.
    pub fn parse_fields(input: &str) -> Result<Self, SelectionError> {
        let tokens = tokenize(input)?;
        let mut pos = 0;
        let sel = parse_set(&tokens, &mut pos, 0)?;
        if pos != tokens.len() {
            return Err(SelectionError::Unbalanced);
        }
        if sel.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(sel)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match item {
                Item::Field(name) => f.write_str(name)?,
                Item::Nested(name, sub) => write!(f, "{name} {{ {sub} }}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Name(&'a str),
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, SelectionError> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in input.char_indices() {
        let is_sep = ch.is_whitespace() || ch == ',' || ch == '{' || ch == '}';
        if is_sep {
            if let Some(s) = start.take() {
                push_name(&mut out, &input[s..i])?;
            }
            match ch {
                '{' => out.push(Token::Open),
                '}' => out.push(Token::Close),
                _ => {}
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        push_name(&mut out, &input[s..])?;
    }
    Ok(out)
}

fn push_name<'a>(out: &mut Vec<Token<'a>>, raw: &'a str) -> Result<(), SelectionError> {
    if !is_name(raw) {
        return Err(SelectionError::InvalidField(raw.to_string()));
    }
    out.push(Token::Name(raw));
    Ok(())
}

fn parse_set(
    tokens: &[Token<'_>],
    pos: &mut usize,
    depth: usize,
) -> Result<Selection, SelectionError> {
    let mut sel = Selection::new();
    while *pos < tokens.len() {
        match tokens[*pos] {
            Token::Name(name) => {
                *pos += 1;
                if tokens.get(*pos) == Some(&Token::Open) {
                    if depth + 1 > MAX_DEPTH {
                        return Err(SelectionError::TooDeep);
                    }
                    *pos += 1;
                    let sub = parse_set(tokens, pos, depth + 1)?;
                    if tokens.get(*pos) != Some(&Token::Close) {
                        return Err(SelectionError::Unbalanced);
                    }
                    *pos += 1;
                    sel = sel.nested(name, sub)?;
                } else {
                    sel = sel.field(name)?;
                }
            }
            Token::Close if depth > 0 => return Ok(sel),
            Token::Open | Token::Close => return Err(SelectionError::Unbalanced),
        }
    }
    if depth > 0 {
        return Err(SelectionError::Unbalanced);
    }
    Ok(sel)
}
