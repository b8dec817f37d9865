use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Illegal,
    Eof,

    Identifier,
    Int,

    Assign,
    Plus, Minus,
    Not,
    Multiply, Divide, Modulo,

    Less, Greater,
    LessEqual, GreaterEqual,
    Equal, NotEqual,

    PlusAssign, MinusAssign,
    MultiplyAssign, DivideAssign,

    Comma, Semicolon,
    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,

    // Keywords
    Function,
    Let,
    Return,
    True, False,
    If, Else,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Identifier => "IDENT",
            TokenType::Int => "INT",
            TokenType::Assign => "=",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Not => "!",
            TokenType::Multiply => "*",
            TokenType::Divide => "/",
            TokenType::Modulo => "%",
            TokenType::Less => "<",
            TokenType::Greater => ">",
            TokenType::LessEqual => "<=",
            TokenType::GreaterEqual => ">=",
            TokenType::Equal => "==",
            TokenType::NotEqual => "!=",
            TokenType::PlusAssign => "+=",
            TokenType::MinusAssign => "-=",
            TokenType::MultiplyAssign => "*=",
            TokenType::DivideAssign => "/=",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::ParenthesisLeft => "(",
            TokenType::ParenthesisRight => ")",
            TokenType::BracketLeft => "{",
            TokenType::BracketRight => "}",
            TokenType::Function => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::Return => "RETURN",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
        })
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("fn", TokenType::Function),
        ("let", TokenType::Let),
        ("return", TokenType::Return),
        ("true", TokenType::True),
        ("false", TokenType::False),
        ("if", TokenType::If),
        ("else", TokenType::Else),
    ]);
}

/// Classifies a scanned word as a keyword or a plain identifier.
pub fn lookup_identifier(name: &str) -> TokenType {
    KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    literal: String,
    pos: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, literal: String, pos: TokenPos) -> Token {
        Token { token_type, literal, pos }
    }

    pub fn empty() -> Token {
        Token {
            token_type: TokenType::Illegal,
            literal: String::new(),
            pos: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn literal(&self) -> &str { &self.literal }
    pub fn pos(&self) -> &TokenPos { &self.pos }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("EOF"),
            _ => write!(f, "`{}`", self.literal),
        }
    }
}

/// Character-scanning state machine over a source string.
///
/// `next_token` can be called any number of times; once the input is
/// exhausted every call returns an `EOF` token.
pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return self.make_token(TokenType::Eof),
        };

        match c {
            '=' => self.make_assign_suffixed(TokenType::Assign, TokenType::Equal),
            '!' => self.make_assign_suffixed(TokenType::Not, TokenType::NotEqual),
            '<' => self.make_assign_suffixed(TokenType::Less, TokenType::LessEqual),
            '>' => self.make_assign_suffixed(TokenType::Greater, TokenType::GreaterEqual),
            '+' => self.make_assign_suffixed(TokenType::Plus, TokenType::PlusAssign),
            '-' => self.make_assign_suffixed(TokenType::Minus, TokenType::MinusAssign),
            '*' => self.make_assign_suffixed(TokenType::Multiply, TokenType::MultiplyAssign),
            '/' => self.make_assign_suffixed(TokenType::Divide, TokenType::DivideAssign),
            '%' => self.make_token(TokenType::Modulo),

            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '(' => self.make_token(TokenType::ParenthesisLeft),
            ')' => self.make_token(TokenType::ParenthesisRight),
            '{' => self.make_token(TokenType::BracketLeft),
            '}' => self.make_token(TokenType::BracketRight),

            c if util::is_digit(c) => self.scan_number(),
            c if util::is_letter(c) => self.scan_identifier(),

            _ => self.make_token(TokenType::Illegal),
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_digit(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Int)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_letter(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        self.make_token(lookup_identifier(name))
    }

    // `=`, `<` and friends: one character of lookahead decides between the
    // single-character token and its `=`-suffixed form
    fn make_assign_suffixed(&mut self, base: TokenType, with_assign: TokenType) -> Token {
        if self.expect('=') {
            self.make_token(with_assign)
        } else {
            self.make_token(base)
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            literal: self.input[self.start_index..self.current_index].to_owned(),
            pos: self.start_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek_1.take().or_else(|| self.chars.next())?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !util::is_whitespace(c) {
                return;
            }

            self.consume();
        }
    }
}

/// Yields every token before `EOF`.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();

        if token.token_type == TokenType::Eof {
            None
        } else {
            Some(token)
        }
    }
}
