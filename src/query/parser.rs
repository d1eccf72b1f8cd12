//! Textual query syntax.
//!
//! Steps are separated by `/`:
//!
//! - `Tag` - first child with that tag
//! - `2`, `-1` - child at a position
//! - `Tag[*]` - every child with that tag
//! - `Tag[id,name=a,b]` - children whose `id` or `name` is `a` or `b`
//! - `Tag[*][:2]`, `Tag[id=a][::-1]`, `Tag[:3:2]` - sliced results
//!
//! Values may be quoted with `'` or `"` to include `,`, `]` or `/`.

use super::ast::{Filter, Query};
use crate::error::{Result, YaxiError};

/// Parser for textual queries.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

/// Parses a textual query. A single step is returned as-is, several as a path.
pub fn parse_query(query: &str) -> Result<Query> {
    Parser::parse(query)
}

impl Parser {
    pub fn new(query: &str) -> Self {
        Self {
            input: query.chars().collect(),
            position: 0,
        }
    }

    pub fn parse(query: &str) -> Result<Query> {
        let mut parser = Parser::new(query);
        parser.parse_query()
    }

    fn parse_query(&mut self) -> Result<Query> {
        let mut steps = vec![self.parse_step()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.next();
                    steps.push(self.parse_step()?);
                }
                Some(ch) => return Err(self.error(format!("unexpected '{}'", ch))),
                None => break,
            }
        }
        if steps.len() == 1 {
            Ok(steps.remove(0))
        } else {
            Ok(Query::Path(steps))
        }
    }

    fn parse_step(&mut self) -> Result<Query> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') | Some('0'..='9') => Ok(Query::Position(self.parse_integer()?)),
            Some(_) => {
                let tag = self.parse_identifier()?;
                if self.peek() == Some('[') {
                    Ok(Query::Filter(self.parse_filter(tag)?))
                } else {
                    Ok(Query::Tag(tag))
                }
            }
            None => Err(self.error("expected a query step")),
        }
    }

    /// Parses `[body]` and an optional `[slice]` after a tag.
    fn parse_filter(&mut self, tag: String) -> Result<Filter> {
        let mut filter = Filter::new(tag);
        self.expect('[')?;
        self.skip_whitespace();
        match self.peek() {
            Some('*') => {
                self.next();
                self.expect(']')?;
            }
            Some(':') => {
                self.parse_slice(&mut filter)?;
                return Ok(filter);
            }
            _ => {
                filter.attributes = self.parse_list(Self::parse_identifier, '=')?;
                self.expect('=')?;
                filter.values = self.parse_list(Self::parse_value, ']')?;
                self.expect(']')?;
            }
        }
        if self.peek() == Some('[') {
            self.next();
            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(self.error("expected ':' to start a slice"));
            }
            self.parse_slice(&mut filter)?;
        }
        Ok(filter)
    }

    /// Parses `:stop]`, `:stop:step]` or `::step]`; the opening `[` is consumed.
    fn parse_slice(&mut self, filter: &mut Filter) -> Result<()> {
        self.expect(':')?;
        self.skip_whitespace();
        if matches!(self.peek(), Some('-') | Some('0'..='9')) {
            filter.stop = Some(self.parse_integer()?);
        }
        self.skip_whitespace();
        if self.peek() == Some(':') {
            self.next();
            self.skip_whitespace();
            if matches!(self.peek(), Some('-') | Some('0'..='9')) {
                let step = self.parse_integer()?;
                if step == 0 {
                    return Err(self.error("slice step cannot be zero"));
                }
                *filter = filter.clone().step(step);
            }
        }
        self.expect(']')
    }

    /// Parses items separated by `,` up to (not including) `terminator`.
    fn parse_list(
        &mut self,
        item: fn(&mut Self) -> Result<String>,
        terminator: char,
    ) -> Result<Vec<String>> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(terminator) && items.is_empty() {
                return Ok(items);
            }
            items.push(item(self)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.next();
                }
                _ => return Ok(items),
            }
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':') {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(self.error("expected a name"))
        } else {
            Ok(name)
        }
    }

    fn parse_value(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.next();
                let mut value = String::new();
                loop {
                    match self.next() {
                        Some(ch) if ch == quote => return Ok(value),
                        Some(ch) => value.push(ch),
                        None => return Err(self.error(format!("unterminated {} string", quote))),
                    }
                }
            }
            _ => {
                let mut value = String::new();
                while let Some(ch) = self.peek() {
                    if ch == ',' || ch == ']' {
                        break;
                    }
                    value.push(ch);
                    self.next();
                }
                let value = value.trim_end().to_string();
                if value.is_empty() {
                    Err(self.error("expected a value"))
                } else {
                    Ok(value)
                }
            }
        }
    }

    fn parse_integer(&mut self) -> Result<isize> {
        let start = self.position;
        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push('-');
            self.next();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.next();
            } else {
                break;
            }
        }
        digits.parse::<isize>().map_err(|_| YaxiError::Syntax {
            position: start,
            message: format!("invalid integer '{}'", digits),
        })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.next();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("found '{}', expected '{}'", ch, expected))),
            None => Err(self.error(format!("unexpected end, expected '{}'", expected))),
        }
    }

    fn error(&self, message: impl Into<String>) -> YaxiError {
        YaxiError::Syntax {
            position: self.position,
            message: message.into(),
        }
    }
}
