//! Strict reader for the learner's `GAME_CONFIG` object literal
//!
//! Nothing is ever evaluated. The accepted grammar is a JavaScript object
//! literal restricted to plain data: numbers (optionally signed), single or
//! double quoted strings, `true`, `false`, `null`, nested objects and arrays,
//! unquoted or quoted keys, trailing commas and `//` / `/* */` comments.
//! Anything else in value position is reported as an evaluation error.

use serde_json::{Map, Number, Value};

use crate::error::ConfigError;

/// Name of the binding the editor template declares
pub const BINDING: &str = "GAME_CONFIG";

/// Deepest object/array nesting accepted in a literal
pub const MAX_NESTING: usize = 64;

/// Source position (1-based) for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pos {
    line: u32,
    column: u32,
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Semicolon,
    Assign,
    Minus,
    Plus,
    Number(String),
    Str(String),
    Ident(String),
    /// Any other punctuation (operators, parentheses, dots, ...)
    Other(char),
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::LBrace => "`{`".to_string(),
            Tok::RBrace => "`}`".to_string(),
            Tok::LBracket => "`[`".to_string(),
            Tok::RBracket => "`]`".to_string(),
            Tok::Colon => "`:`".to_string(),
            Tok::Comma => "`,`".to_string(),
            Tok::Semicolon => "`;`".to_string(),
            Tok::Assign => "`=`".to_string(),
            Tok::Minus => "`-`".to_string(),
            Tok::Plus => "`+`".to_string(),
            Tok::Number(n) => format!("number `{n}`"),
            Tok::Str(s) => format!("string {:?}", s),
            Tok::Ident(i) => format!("`{i}`"),
            Tok::Other(c) => format!("`{c}`"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    pos: Pos,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pos: Pos,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            pos: Pos { line: 1, column: 1 },
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Peek one character past the next
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ConfigError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            let pos = self.pos;

            if c.is_whitespace() {
                self.bump();
                continue;
            }

            if c == '/' {
                match self.peek_second() {
                    Some('/') => {
                        while self.peek().is_some_and(|c| c != '\n') {
                            self.bump();
                        }
                        continue;
                    }
                    Some('*') => {
                        self.bump();
                        self.bump();
                        self.block_comment(pos)?;
                        continue;
                    }
                    _ => {}
                }
            }

            let tok = match c {
                '{' => self.single(Tok::LBrace),
                '}' => self.single(Tok::RBrace),
                '[' => self.single(Tok::LBracket),
                ']' => self.single(Tok::RBracket),
                ':' => self.single(Tok::Colon),
                ',' => self.single(Tok::Comma),
                ';' => self.single(Tok::Semicolon),
                '=' => self.single(Tok::Assign),
                '-' => self.single(Tok::Minus),
                '+' => self.single(Tok::Plus),
                '"' | '\'' => self.string(c, pos)?,
                '0'..='9' => self.number(),
                '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.number(),
                c if c.is_alphabetic() || c == '_' || c == '$' => self.ident(),
                other => self.single(Tok::Other(other)),
            };
            tokens.push(Token { tok, pos });
        }
        Ok(tokens)
    }

    fn single(&mut self, tok: Tok) -> Tok {
        self.bump();
        tok
    }

    fn block_comment(&mut self, start: Pos) -> Result<(), ConfigError> {
        while let Some(c) = self.bump() {
            if c == '*' && self.peek() == Some('/') {
                self.bump();
                return Ok(());
            }
        }
        Err(ConfigError::Parse(format!("unterminated comment starting at {start}")))
    }

    fn string(&mut self, quote: char, start: Pos) -> Result<Tok, ConfigError> {
        self.bump();
        let mut text = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ConfigError::Parse(format!("unterminated string starting at {start}")));
            };
            match c {
                c if c == quote => return Ok(Tok::Str(text)),
                '\n' => {
                    return Err(ConfigError::Parse(format!(
                        "line break inside string starting at {start}"
                    )));
                }
                '\\' => {
                    let escaped = self.bump().ok_or_else(|| {
                        ConfigError::Parse(format!("unterminated string starting at {start}"))
                    })?;
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        '0' => text.push('\0'),
                        'u' => text.push(self.unicode_escape(start)?),
                        // Line continuation
                        '\n' => {}
                        other => text.push(other),
                    }
                }
                c => text.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, start: Pos) -> Result<char, ConfigError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| {
                    ConfigError::Parse(format!("bad \\u escape in string starting at {start}"))
                })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| {
            ConfigError::Parse(format!("bad \\u escape in string starting at {start}"))
        })
    }

    fn number(&mut self) -> Tok {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '-' || c == '+') && text.ends_with(['e', 'E']);
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Tok::Number(text)
    }

    fn ident(&mut self) -> Tok {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Tok::Ident(text)
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    /// Objects and arrays currently open
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn enter(&mut self, pos: Pos) -> Result<(), ConfigError> {
        if self.depth >= MAX_NESTING {
            return Err(ConfigError::Parse(format!(
                "nesting too deep at {pos} (at most {MAX_NESTING} levels)"
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn unexpected_end(what: &str) -> ConfigError {
        ConfigError::Parse(format!("unexpected end of code while reading {what}"))
    }

    /// Position the cursor just after `const|let|var GAME_CONFIG =`
    fn seek_declaration(&mut self) -> Result<(), ConfigError> {
        let found = self.tokens.windows(3).position(|w| {
            matches!(&w[0].tok, Tok::Ident(kw) if kw == "const" || kw == "let" || kw == "var")
                && matches!(&w[1].tok, Tok::Ident(name) if name == BINDING)
                && w[2].tok == Tok::Assign
        });
        match found {
            Some(i) => {
                self.index = i + 3;
                Ok(())
            }
            None => Err(ConfigError::Parse(format!(
                "could not find the {BINDING} object. Make sure it starts with \"const {BINDING} = {{\""
            ))),
        }
    }

    fn value(&mut self) -> Result<Value, ConfigError> {
        let value = self.atom()?;
        self.reject_trailing_expression()?;
        Ok(value)
    }

    /// The declared value itself; unlike nested values it may be followed by
    /// more code on the next statement
    fn declared_value(&mut self) -> Result<Value, ConfigError> {
        let value = self.atom()?;
        if let Some(Token {
            tok: tok @ (Tok::Other(_) | Tok::Minus | Tok::Plus | Tok::LBracket),
            pos,
        }) = self.peek()
        {
            return Err(ConfigError::Evaluation(format!(
                "expression with {} at {pos}: {BINDING} must be a plain object",
                tok.describe()
            )));
        }
        Ok(value)
    }

    fn atom(&mut self) -> Result<Value, ConfigError> {
        let token = self.next().ok_or_else(|| Self::unexpected_end("a value"))?;
        let value = match token.tok {
            Tok::LBrace => {
                self.enter(token.pos)?;
                let body = self.object_body(token.pos)?;
                self.depth -= 1;
                Value::Object(body)
            }
            Tok::LBracket => {
                self.enter(token.pos)?;
                let items = self.array_body(token.pos)?;
                self.depth -= 1;
                items
            }
            Tok::Str(s) => Value::String(s),
            Tok::Number(text) => number_value(&text, false, token.pos)?,
            Tok::Minus | Tok::Plus => {
                let negative = token.tok == Tok::Minus;
                match self.next() {
                    Some(Token {
                        tok: Tok::Number(text),
                        pos,
                    }) => number_value(&text, negative, pos)?,
                    Some(other) => {
                        return Err(ConfigError::Evaluation(format!(
                            "unary {} applied to {} at {}",
                            token.tok.describe(),
                            other.tok.describe(),
                            token.pos
                        )));
                    }
                    None => return Err(Self::unexpected_end("a number")),
                }
            }
            Tok::Ident(ident) => match ident.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                _ => {
                    return Err(ConfigError::Evaluation(format!(
                        "`{ident}` at {}: only literal values are allowed",
                        token.pos
                    )));
                }
            },
            other => {
                return Err(ConfigError::Parse(format!(
                    "expected a value but found {} at {}",
                    other.describe(),
                    token.pos
                )));
            }
        };
        Ok(value)
    }

    /// A value must be followed by a separator; operators and calls are expressions
    fn reject_trailing_expression(&self) -> Result<(), ConfigError> {
        match self.peek() {
            Some(Token {
                tok: Tok::Comma | Tok::RBrace | Tok::RBracket | Tok::Semicolon,
                ..
            })
            | None => Ok(()),
            Some(Token {
                tok: tok @ (Tok::Other(_) | Tok::Minus | Tok::Plus),
                pos,
            }) => Err(ConfigError::Evaluation(format!(
                "expression with {} at {pos}: only literal values are allowed",
                tok.describe()
            ))),
            Some(Token { tok, pos }) => Err(ConfigError::Parse(format!(
                "expected `,` but found {} at {pos}",
                tok.describe()
            ))),
        }
    }

    fn object_body(&mut self, open: Pos) -> Result<Map<String, Value>, ConfigError> {
        let mut map = Map::new();
        loop {
            let token = self
                .next()
                .ok_or_else(|| ConfigError::Parse(format!("object opened at {open} is never closed")))?;
            let key = match token.tok {
                Tok::RBrace => return Ok(map),
                Tok::Ident(name) => name,
                Tok::Str(name) => name,
                Tok::LBracket => {
                    return Err(ConfigError::Evaluation(format!(
                        "computed property name at {}",
                        token.pos
                    )));
                }
                other => {
                    return Err(ConfigError::Parse(format!(
                        "expected a property name but found {} at {}",
                        other.describe(),
                        token.pos
                    )));
                }
            };

            match self.next() {
                Some(Token {
                    tok: Tok::Colon, ..
                }) => {}
                Some(Token { tok, pos }) => {
                    return Err(ConfigError::Parse(format!(
                        "expected `:` after `{key}` but found {} at {pos}",
                        tok.describe()
                    )));
                }
                None => return Err(Self::unexpected_end("a property")),
            }

            let value = self.value()?;
            // Later duplicates win, as they would in JavaScript
            map.insert(key, value);

            match self.next() {
                Some(Token {
                    tok: Tok::Comma, ..
                }) => {}
                Some(Token {
                    tok: Tok::RBrace, ..
                }) => return Ok(map),
                Some(Token { tok, pos }) => {
                    return Err(ConfigError::Parse(format!(
                        "expected `,` or `}}` but found {} at {pos}",
                        tok.describe()
                    )));
                }
                None => {
                    return Err(ConfigError::Parse(format!(
                        "object opened at {open} is never closed"
                    )));
                }
            }
        }
    }

    fn array_body(&mut self, open: Pos) -> Result<Value, ConfigError> {
        let mut items = Vec::new();
        loop {
            if let Some(Token {
                tok: Tok::RBracket, ..
            }) = self.peek()
            {
                self.next();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            match self.next() {
                Some(Token {
                    tok: Tok::Comma, ..
                }) => {}
                Some(Token {
                    tok: Tok::RBracket, ..
                }) => return Ok(Value::Array(items)),
                Some(Token { tok, pos }) => {
                    return Err(ConfigError::Parse(format!(
                        "expected `,` or `]` but found {} at {pos}",
                        tok.describe()
                    )));
                }
                None => {
                    return Err(ConfigError::Parse(format!(
                        "array opened at {open} is never closed"
                    )));
                }
            }
        }
    }
}

fn number_value(text: &str, negative: bool, pos: Pos) -> Result<Value, ConfigError> {
    let is_integer = text.bytes().all(|b| b.is_ascii_digit());
    if is_integer {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(if negative { -n } else { n })));
        }
    }
    let parsed: f64 = text
        .parse()
        .map_err(|_| ConfigError::Parse(format!("malformed number `{text}` at {pos}")))?;
    let parsed = if negative { -parsed } else { parsed };
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| ConfigError::Parse(format!("number `{text}` at {pos} is out of range")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Find the `GAME_CONFIG` declaration in `source` and read its object literal
pub fn parse_game_config(source: &str) -> Result<Map<String, Value>, ConfigError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
    };
    parser.seek_declaration()?;
    match parser.declared_value()? {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::NotARecord {
            found: kind_of(&other),
        }),
    }
}
