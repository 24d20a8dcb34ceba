use std::collections::VecDeque;

use regex::Regex;

use crate::{FontError, FontProperties, Result};

lazy_static::lazy_static! {
    // words and signed numbers, block comment delimiters, line comment, any other single symbol
    static ref TOKEN: Regex = Regex::new(r"-?\w+|/\*|\*/|//|[^\w\s]").unwrap();
}

/// Splits C source into tokens a line at a time, dropping comments and preprocessor lines.
///
/// A `/* PROPERTIES` block is not tokenized; its `KEY VALUE` lines are collected into
/// [`FontProperties`] instead.
pub(crate) struct Tokenizer<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
    tokens: VecDeque<String>,
    in_comment: bool,
    properties: FontProperties,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
            tokens: VecDeque::new(),
            in_comment: false,
            properties: FontProperties::default(),
        }
    }

    /// 1 based number of the line the last token came from.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_properties(self) -> FontProperties {
        self.properties
    }

    fn read_line(&mut self) -> Result<&'a str> {
        let Some(line) = self.lines.next() else {
            return Err(FontError::UnexpectedEof { line: self.line });
        };
        self.line += 1;
        Ok(line.trim())
    }

    fn fill(&mut self) -> Result<()> {
        while self.tokens.is_empty() {
            let line = self.read_line()?;
            if line.is_empty() {
                continue;
            }
            if !self.in_comment {
                if line.starts_with('#') {
                    log::debug!("[line:{}] skipping directive '{line}'", self.line);
                    continue;
                }
                if line.starts_with("/* PROPERTIES") {
                    self.read_properties()?;
                    continue;
                }
            }
            self.tokens.extend(TOKEN.find_iter(line).map(|m| m.as_str().to_string()));
        }
        Ok(())
    }

    fn read_properties(&mut self) -> Result<()> {
        loop {
            let line = self.read_line()?;
            if line.starts_with("*/") {
                return Ok(());
            }
            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let value = value.trim();
            let number = value.parse::<i32>().ok();
            match key {
                "FONT_NAME" => self.properties.font_name = Some(value.to_string()),
                "PIXEL_SIZE" => self.properties.pixel_size = number,
                "FONT_ASCENT" => self.properties.ascent = number,
                "FONT_DESCENT" => self.properties.descent = number,
                _ => log::debug!("[line:{}] ignoring property '{key}'", self.line),
            }
        }
    }

    /// Next token outside of comments.
    pub fn next_token(&mut self) -> Result<String> {
        loop {
            self.fill()?;
            let Some(tok) = self.tokens.pop_front() else {
                continue;
            };
            if self.in_comment {
                if tok == "*/" {
                    self.in_comment = false;
                }
                continue;
            }
            match tok.as_str() {
                "//" => self.tokens.clear(),
                "/*" => self.in_comment = true,
                _ => return Ok(tok),
            }
        }
    }

    /// Puts a token back in front of the stream.
    pub fn restore(&mut self, tok: String) {
        self.tokens.push_front(tok);
    }

    /// Checks the next token without consuming it.
    pub fn peek_is(&mut self, expected: &str) -> Result<bool> {
        let tok = self.next_token()?;
        let result = tok == expected;
        self.restore(tok);
        Ok(result)
    }

    /// Consumes the next token if it matches.
    pub fn optional(&mut self, expected: &str) -> Result<bool> {
        let tok = self.next_token()?;
        if tok == expected {
            return Ok(true);
        }
        self.restore(tok);
        Ok(false)
    }

    pub fn expect(&mut self, expected: &str) -> Result<()> {
        let tok = self.next_token()?;
        if tok != expected {
            return Err(FontError::unexpected_token(self.line, expected, tok));
        }
        Ok(())
    }

    pub fn expect_all(&mut self, expected: &[&str]) -> Result<()> {
        for e in expected {
            self.expect(e)?;
        }
        Ok(())
    }

    /// Decimal or `0x` hexadecimal, optionally negative.
    pub fn number(&mut self) -> Result<i32> {
        let tok = self.next_token()?;
        parse_number(&tok).ok_or(FontError::ExpectedNumber { line: self.line, found: tok })
    }

    /// Comma separated numbers up to (not including) the closing `}`.
    pub fn number_list(&mut self) -> Result<Vec<i32>> {
        let mut values = Vec::new();
        while !self.peek_is("}")? {
            values.push(self.number()?);
            if !self.optional(",")? {
                break;
            }
        }
        Ok(values)
    }

    /// Like [`Tokenizer::number_list`], but every value has to fit into a byte.
    pub fn byte_list(&mut self) -> Result<Vec<u8>> {
        let mut values = Vec::new();
        while !self.peek_is("}")? {
            let value = self.number()?;
            let Ok(byte) = u8::try_from(value) else {
                return Err(FontError::malformed(self.line, format!("bitmap value {value} does not fit into a byte")));
            };
            values.push(byte);
            if !self.optional(",")? {
                break;
            }
        }
        Ok(values)
    }
}

fn parse_number(tok: &str) -> Option<i32> {
    let (negative, digits) = match tok.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tok),
    };
    let value = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => {
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<i64>().ok()?
        }
    };
    i32::try_from(if negative { -value } else { value }).ok()
}
