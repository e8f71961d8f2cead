//! Parser for literal-sequence cell text in citation tables.
//!
//! The extraction stage serializes list-valued columns as Python-repr text
//! (`['span one', 'span two']`, `[{'match_text': '...', 'similarity': 0.9}]`)
//! or the JSON equivalent with double quotes. Cells are small, so a cursor
//! over a char buffer keeps this simple.

use thiserror::Error;

use crate::models::CitationMatch;

#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("expected {expected} at offset {offset}")]
    Expected { expected: &'static str, offset: usize },
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("bad escape sequence at offset {0}")]
    BadEscape(usize),
    #[error("bad number at offset {0}")]
    BadNumber(usize),
    #[error("trailing characters at offset {0}")]
    Trailing(usize),
    #[error("match entry missing key {0:?}")]
    MissingKey(&'static str),
    #[error("match entry key {0:?} has the wrong type")]
    WrongType(&'static str),
}

/// Parse a cell holding a list of strings.
pub fn parse_string_list(cell: &str) -> Result<Vec<String>, LiteralError> {
    let mut cursor = Cursor::new(cell);
    cursor.expect('[', "'['")?;
    let mut items = Vec::new();
    loop {
        cursor.skip_ws();
        if cursor.eat(']') {
            break;
        }
        items.push(cursor.parse_string()?);
        cursor.skip_ws();
        if cursor.eat(',') {
            continue;
        }
        cursor.expect(']', "',' or ']'")?;
        break;
    }
    cursor.finish()?;
    Ok(items)
}

/// Parse a cell holding a list of `{match_text, similarity}` entries.
pub fn parse_match_list(cell: &str) -> Result<Vec<CitationMatch>, LiteralError> {
    let mut cursor = Cursor::new(cell);
    cursor.expect('[', "'['")?;
    let mut items = Vec::new();
    loop {
        cursor.skip_ws();
        if cursor.eat(']') {
            break;
        }
        items.push(cursor.parse_match()?);
        cursor.skip_ws();
        if cursor.eat(',') {
            continue;
        }
        cursor.expect(']', "',' or ']'")?;
        break;
    }
    cursor.finish()?;
    Ok(items)
}

/// Scalar values allowed inside a match entry.
enum Scalar {
    Str(String),
    Num(f64),
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), LiteralError> {
        self.skip_ws();
        if self.eat(want) {
            Ok(())
        } else {
            Err(LiteralError::Expected {
                expected,
                offset: self.pos,
            })
        }
    }

    /// Everything after the closing bracket must be whitespace.
    fn finish(&mut self) -> Result<(), LiteralError> {
        self.skip_ws();
        if self.pos < self.chars.len() {
            Err(LiteralError::Trailing(self.pos))
        } else {
            Ok(())
        }
    }

    /// A single- or double-quoted string with backslash escapes.
    fn parse_string(&mut self) -> Result<String, LiteralError> {
        self.skip_ws();
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => {
                return Err(LiteralError::Expected {
                    expected: "string",
                    offset: start,
                })
            }
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, LiteralError> {
        let at = self.pos;
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('x') => self.parse_hex_escape(2, at),
            Some('u') => self.parse_hex_escape(4, at),
            _ => Err(LiteralError::BadEscape(at)),
        }
    }

    fn parse_hex_escape(&mut self, digits: usize, at: usize) -> Result<char, LiteralError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(LiteralError::BadEscape(at))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or(LiteralError::BadEscape(at))
    }

    fn parse_number(&mut self) -> Result<f64, LiteralError> {
        self.skip_ws();
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.eat('.') {
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().map_err(|_| LiteralError::BadNumber(start))
    }

    fn parse_scalar(&mut self) -> Result<Scalar, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some('\'' | '"') => Ok(Scalar::Str(self.parse_string()?)),
            _ => Ok(Scalar::Num(self.parse_number()?)),
        }
    }

    /// A `{'match_text': ..., 'similarity': ...}` entry. Key order is not
    /// significant and unknown keys are tolerated.
    fn parse_match(&mut self) -> Result<CitationMatch, LiteralError> {
        self.expect('{', "'{'")?;
        let mut match_text = None;
        let mut similarity = None;
        loop {
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            let key = self.parse_string()?;
            self.expect(':', "':'")?;
            let value = self.parse_scalar()?;
            match (key.as_str(), value) {
                ("match_text", Scalar::Str(s)) => match_text = Some(s),
                ("match_text", Scalar::Num(_)) => {
                    return Err(LiteralError::WrongType("match_text"));
                }
                ("similarity", Scalar::Num(n)) => similarity = Some(n),
                ("similarity", Scalar::Str(_)) => {
                    return Err(LiteralError::WrongType("similarity"));
                }
                _ => {}
            }
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.expect('}', "',' or '}'")?;
            break;
        }
        Ok(CitationMatch {
            match_text: match_text.ok_or(LiteralError::MissingKey("match_text"))?,
            similarity: similarity.ok_or(LiteralError::MissingKey("similarity"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_python_repr_string_list() {
        let items = parse_string_list("['first span', 'second span']").unwrap();
        assert_eq!(items, vec!["first span", "second span"]);
    }

    #[test]
    fn parses_json_style_string_list() {
        let items = parse_string_list(r#"[ "c1", "c2" ]"#).unwrap();
        assert_eq!(items, vec!["c1", "c2"]);
    }

    #[test]
    fn parses_empty_list() {
        assert!(parse_string_list("[]").unwrap().is_empty());
        assert!(parse_match_list("[ ]").unwrap().is_empty());
    }

    #[test]
    fn handles_escapes_and_embedded_quotes() {
        let items = parse_string_list(r#"['it\'s here', "line\nbreak", '\x41é']"#).unwrap();
        assert_eq!(items, vec!["it's here", "line\nbreak", "Aé"]);
    }

    #[test]
    fn parses_match_entries_in_either_quote_style() {
        let matches =
            parse_match_list("[{'match_text': 'the quoted span', 'similarity': 0.91}]").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_text, "the quoted span");
        assert!((matches[0].similarity - 0.91).abs() < 1e-9);

        let matches =
            parse_match_list(r#"[{"similarity": 1, "match_text": "exact"}]"#).unwrap();
        assert_eq!(matches[0].match_text, "exact");
        assert_eq!(matches[0].similarity, 1.0);
    }

    #[test]
    fn tolerates_unknown_keys() {
        let matches = parse_match_list(
            "[{'match_text': 'span', 'similarity': 0.5, 'page': 3, 'source': 'ocr'}]",
        )
        .unwrap();
        assert_eq!(matches[0].match_text, "span");
    }

    #[test]
    fn rejects_malformed_cells() {
        assert!(parse_string_list("not a list").is_err());
        assert!(parse_string_list("['unterminated]").is_err());
        assert!(parse_string_list("['a'] trailing").is_err());
        assert!(parse_match_list("[{'match_text': 'span'}]").is_err());
        assert!(parse_match_list("[{'match_text': 1, 'similarity': 0.5}]").is_err());
    }

    #[test]
    fn reports_offsets() {
        let err = parse_string_list("  ['a', 5]").unwrap_err();
        assert_eq!(
            err,
            LiteralError::Expected {
                expected: "string",
                offset: 8
            }
        );
    }
}
