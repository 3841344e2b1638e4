//! Shorthand structure parser
//!
//! Parses the compact notation used for structured flag values:
//!
//! ```text
//! Objects=[{Key=a},{Key=b}],Quiet=false
//! Parts=[{ETag=etag1,PartNumber=1},{ETag=etag2,PartNumber=2}]
//! Status=Enabled
//! ```
//!
//! The top level is an implicit record. A value starting with `{` is a nested
//! record, a value starting with `[` is a list, anything else is a scalar
//! taken verbatim. Input that starts with `{"` is parsed as JSON instead.

use std::fmt;

use crate::error::BindingError;

/// Untyped result of parsing a shorthand or JSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Scalar(String),
    /// Entries in input order; keys are unique
    Record(Vec<(String, ParsedValue)>),
    List(Vec<ParsedValue>),
}

impl ParsedValue {
    /// Look up a record entry by key
    pub fn get(&self, key: &str) -> Option<&ParsedValue> {
        match self {
            ParsedValue::Record(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedValue::Scalar(_) => "a scalar",
            ParsedValue::Record(_) => "a structure",
            ParsedValue::List(_) => "a list",
        }
    }
}

/// Parse a structured flag value
///
/// JSON object syntax is detected by a leading `{` followed by a quoted key.
/// Anything else goes through the shorthand grammar.
pub fn parse(input: &str) -> Result<ParsedValue, BindingError> {
    if looks_like_json(input) {
        return parse_json(input);
    }

    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let record = parser.pairs(None)?;
    Ok(ParsedValue::Record(record))
}

fn looks_like_json(input: &str) -> bool {
    let mut chars = input.trim_start().chars();
    if chars.next() != Some('{') {
        return false;
    }
    chars.find(|c| !c.is_whitespace()) == Some('"')
}

fn parse_json(input: &str) -> Result<ParsedValue, BindingError> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| BindingError::invalid(format!("invalid JSON: {e}")))?;
    from_json(value)
}

fn from_json(value: serde_json::Value) -> Result<ParsedValue, BindingError> {
    use serde_json::Value;

    match value {
        Value::Null => Err(BindingError::invalid("null is not a supported value")),
        Value::Bool(b) => Ok(ParsedValue::Scalar(b.to_string())),
        Value::Number(n) => Ok(ParsedValue::Scalar(n.to_string())),
        Value::String(s) => Ok(ParsedValue::Scalar(s)),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| from_json(item).map_err(|e| e.within(&format!("[{i}]"))))
            .collect::<Result<Vec<_>, _>>()
            .map(ParsedValue::List),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, item)| {
                let parsed = from_json(item).map_err(|e| e.within(&key))?;
                Ok((key, parsed))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ParsedValue::Record),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Equals,
    Text(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::OpenBrace => f.write_str("'{'"),
            TokenKind::CloseBrace => f.write_str("'}'"),
            TokenKind::OpenBracket => f.write_str("'['"),
            TokenKind::CloseBracket => f.write_str("']'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::Text(text) => write!(f, "'{text}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    /// Byte offset into the input
    offset: usize,
}

/// Split the input into delimiters and trimmed text runs
///
/// Tracks open delimiters on a stack so that unbalanced or mismatched
/// brackets are reported here, before the parser sees any token.
fn tokenize(input: &str) -> Result<Vec<Token>, BindingError> {
    let mut tokens = Vec::new();
    let mut open: Vec<(char, usize)> = Vec::new();
    let mut text_start: Option<usize> = None;

    let flush = |tokens: &mut Vec<Token>, start: Option<usize>, end: usize| {
        if let Some(start) = start {
            let raw = &input[start..end];
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let lead = raw.len() - raw.trim_start().len();
                tokens.push(Token {
                    kind: TokenKind::Text(trimmed.to_string()),
                    offset: start + lead,
                });
            }
        }
    };

    for (offset, c) in input.char_indices() {
        let kind = match c {
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equals,
            _ => {
                text_start.get_or_insert(offset);
                continue;
            }
        };

        flush(&mut tokens, text_start.take(), offset);

        match c {
            '{' | '[' => open.push((c, offset)),
            '}' | ']' => {
                let expected = if c == '}' { '{' } else { '[' };
                match open.pop() {
                    Some((opener, _)) if opener == expected => {}
                    Some((opener, at)) => {
                        return Err(BindingError::malformed(format!(
                            "mismatched '{c}' at position {offset} (closes '{opener}' opened at position {at})"
                        )));
                    }
                    None => {
                        return Err(BindingError::malformed(format!(
                            "unbalanced '{c}' at position {offset}"
                        )));
                    }
                }
            }
            _ => {}
        }

        tokens.push(Token { kind, offset });
    }

    flush(&mut tokens, text_start.take(), input.len());

    if let Some((opener, at)) = open.pop() {
        return Err(BindingError::malformed(format!(
            "unclosed '{opener}' opened at position {at}"
        )));
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

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self, closer: Option<&TokenKind>) -> bool {
        match (self.peek(), closer) {
            (None, _) => true,
            (Some(token), Some(closer)) => &token.kind == closer,
            (Some(_), None) => false,
        }
    }

    /// Parse `key=value` pairs up to `closer` (or end of input at top level)
    ///
    /// Does not consume the closer.
    fn pairs(&mut self, closer: Option<TokenKind>) -> Result<Vec<(String, ParsedValue)>, BindingError> {
        let mut entries: Vec<(String, ParsedValue)> = Vec::new();

        if self.at_end(closer.as_ref()) {
            if closer.is_none() {
                return Err(BindingError::malformed("empty value"));
            }
            return Ok(entries);
        }

        loop {
            let key = match self.next() {
                Some(Token {
                    kind: TokenKind::Text(key),
                    ..
                }) => key,
                Some(Token {
                    kind: TokenKind::Equals,
                    offset,
                }) => {
                    return Err(BindingError::malformed(format!(
                        "empty key at position {offset}"
                    )));
                }
                Some(Token {
                    kind: TokenKind::Comma,
                    offset,
                }) => {
                    return Err(BindingError::malformed(format!(
                        "unexpected ',' at position {offset}"
                    )));
                }
                Some(token) => {
                    return Err(BindingError::malformed(format!(
                        "expected a key, found {} at position {}",
                        token.kind, token.offset
                    )));
                }
                None => return Err(BindingError::malformed("unexpected end of input")),
            };

            match self.next() {
                Some(Token {
                    kind: TokenKind::Equals,
                    ..
                }) => {}
                Some(token) => {
                    return Err(BindingError::malformed(format!(
                        "missing '=' after key '{key}' (found {} at position {})",
                        token.kind, token.offset
                    )));
                }
                None => {
                    return Err(BindingError::malformed(format!(
                        "missing '=' after key '{key}'"
                    )));
                }
            }

            let value = self.value(closer.as_ref()).map_err(|e| e.within(&key))?;

            if entries.iter().any(|(k, _)| *k == key) {
                return Err(BindingError::malformed(format!("duplicate key '{key}'")));
            }
            entries.push((key, value));

            if self.at_end(closer.as_ref()) {
                return Ok(entries);
            }

            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    offset,
                }) => {
                    if self.at_end(closer.as_ref()) {
                        return Err(BindingError::malformed(format!(
                            "dangling ',' at position {offset}"
                        )));
                    }
                }
                Some(token) => {
                    return Err(BindingError::malformed(format!(
                        "unexpected {} at position {}",
                        token.kind, token.offset
                    )));
                }
                None => return Ok(entries),
            }
        }
    }

    fn value(&mut self, closer: Option<&TokenKind>) -> Result<ParsedValue, BindingError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::OpenBrace) => {
                self.next();
                let record = self.pairs(Some(TokenKind::CloseBrace))?;
                self.next();
                Ok(ParsedValue::Record(record))
            }
            Some(TokenKind::OpenBracket) => {
                self.next();
                self.list()
            }
            Some(TokenKind::Text(text)) => {
                self.next();
                Ok(ParsedValue::Scalar(text))
            }
            Some(TokenKind::Equals) => {
                let offset = self.peek().map(|t| t.offset).unwrap_or_default();
                Err(BindingError::malformed(format!(
                    "unexpected '=' at position {offset} (a literal '=' is not supported in values)"
                )))
            }
            // `Key=` followed by a separator or the end: empty scalar
            Some(TokenKind::Comma) | None => Ok(ParsedValue::Scalar(String::new())),
            Some(kind) if Some(&kind) == closer => Ok(ParsedValue::Scalar(String::new())),
            Some(kind) => {
                let offset = self.peek().map(|t| t.offset).unwrap_or_default();
                Err(BindingError::malformed(format!(
                    "unexpected {kind} at position {offset}"
                )))
            }
        }
    }

    /// Parse list elements after the opening `[`, consuming the closing `]`
    fn list(&mut self) -> Result<ParsedValue, BindingError> {
        let mut items = Vec::new();

        if let Some(Token {
            kind: TokenKind::CloseBracket,
            ..
        }) = self.peek()
        {
            self.next();
            return Ok(ParsedValue::List(items));
        }

        loop {
            let index = items.len();
            let item = match self.next() {
                Some(Token {
                    kind: TokenKind::OpenBrace,
                    ..
                }) => {
                    let record = self
                        .pairs(Some(TokenKind::CloseBrace))
                        .map_err(|e| e.within(&format!("[{index}]")))?;
                    self.next();
                    ParsedValue::Record(record)
                }
                Some(Token {
                    kind: TokenKind::Text(text),
                    ..
                }) => ParsedValue::Scalar(text),
                Some(token) => {
                    return Err(BindingError::malformed(format!(
                        "expected a list element, found {} at position {}",
                        token.kind, token.offset
                    )));
                }
                None => return Err(BindingError::malformed("unexpected end of input in list")),
            };
            items.push(item);

            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    offset,
                }) => {
                    if let Some(Token {
                        kind: TokenKind::CloseBracket,
                        ..
                    }) = self.peek()
                    {
                        return Err(BindingError::malformed(format!(
                            "dangling ',' at position {offset}"
                        )));
                    }
                }
                Some(Token {
                    kind: TokenKind::CloseBracket,
                    ..
                }) => return Ok(ParsedValue::List(items)),
                Some(token) => {
                    return Err(BindingError::malformed(format!(
                        "unexpected {} at position {}",
                        token.kind, token.offset
                    )));
                }
                None => return Err(BindingError::malformed("unexpected end of input in list")),
            }
        }
    }
}
