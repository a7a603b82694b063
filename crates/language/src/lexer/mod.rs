#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Error,

    // Literals
    Identifier,
    Integer,
    String,

    // Operators
    EqualEqual,
    NotEqual,
    GreaterEqual,
    LessEqual,
    Less,
    Greater,
    Ampersand,
    Pipe,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Equal,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    // Keywords
    Global,
    Function,
    If,
    Else,
    While,
    Return,
    Do,
    Let,
    Set,
    True,
    False,
    Import,
    Null,
}

impl TokenKind {
    /// How the token kind reads in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Error => "invalid token",
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "number",
            TokenKind::String => "string",
            TokenKind::EqualEqual => "`==`",
            TokenKind::NotEqual => "`!=`",
            TokenKind::GreaterEqual => "`>=`",
            TokenKind::LessEqual => "`<=`",
            TokenKind::Less => "`<`",
            TokenKind::Greater => "`>`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Bang => "`!`",
            TokenKind::Equal => "`=`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Global => "`global`",
            TokenKind::Function => "`function`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Return => "`return`",
            TokenKind::Do => "`do`",
            TokenKind::Let => "`let`",
            TokenKind::Set => "`set`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Import => "`import`",
            TokenKind::Null => "`null`",
        }
    }
}

/// A token is a view into the source: `start..end` are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// Cursor-addressed scanner. `read` never advances anything by itself, the
/// caller decides whether a token was only peeked or consumed.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn lexeme(&self, token: &Token) -> &'a str {
        &self.input[token.start..token.end]
    }

    /// Scan the token that starts at or after `cursor`.
    pub fn read(&self, cursor: usize) -> Token {
        let start = self.skip_trivia(cursor);
        let rest = &self.input[start..];

        let Some(ch) = rest.chars().next() else {
            return Token { start, end: start, kind: TokenKind::Eof };
        };
        let next = rest[ch.len_utf8()..].chars().next();

        let (kind, len) = match ch {
            '=' if next == Some('=') => (TokenKind::EqualEqual, 2),
            '!' if next == Some('=') => (TokenKind::NotEqual, 2),
            '>' if next == Some('=') => (TokenKind::GreaterEqual, 2),
            '<' if next == Some('=') => (TokenKind::LessEqual, 2),
            '=' => (TokenKind::Equal, 1),
            '!' => (TokenKind::Bang, 1),
            '>' => (TokenKind::Greater, 1),
            '<' => (TokenKind::Less, 1),
            '&' => (TokenKind::Ampersand, 1),
            '|' => (TokenKind::Pipe, 1),
            '+' => (TokenKind::Plus, 1),
            '-' => (TokenKind::Minus, 1),
            '*' => (TokenKind::Star, 1),
            '/' => (TokenKind::Slash, 1),
            '%' => (TokenKind::Percent, 1),
            '(' => (TokenKind::LParen, 1),
            ')' => (TokenKind::RParen, 1),
            '[' => (TokenKind::LBracket, 1),
            ']' => (TokenKind::RBracket, 1),
            '{' => (TokenKind::LBrace, 1),
            '}' => (TokenKind::RBrace, 1),
            ',' => (TokenKind::Comma, 1),
            ';' => (TokenKind::Semicolon, 1),
            '"' => return self.read_string(start),
            ch if is_letter(ch) => return self.read_identifier(start),
            ch if ch.is_ascii_digit() => return self.read_number(start),
            ch => (TokenKind::Error, ch.len_utf8()),
        };

        Token { start, end: start + len, kind }
    }

    fn skip_trivia(&self, mut position: usize) -> usize {
        loop {
            let rest = &self.input[position..];
            let trimmed = rest.trim_start();
            position += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                position += trimmed.find('\n').unwrap_or(trimmed.len());
            } else {
                return position;
            }
        }
    }

    fn read_identifier(&self, start: usize) -> Token {
        let end = self.scan_while(start, |ch| is_letter(ch) || ch.is_ascii_digit());
        let kind = match &self.input[start..end] {
            "global" => TokenKind::Global,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "do" => TokenKind::Do,
            "let" => TokenKind::Let,
            "set" => TokenKind::Set,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "import" => TokenKind::Import,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier,
        };
        Token { start, end, kind }
    }

    // Trailing letters stay part of the number so `12ab` is rejected as a
    // whole by the parser instead of splitting into `12` and `ab`.
    fn read_number(&self, start: usize) -> Token {
        let end = self.scan_while(start, |ch| is_letter(ch) || ch.is_ascii_digit());
        Token { start, end, kind: TokenKind::Integer }
    }

    fn read_string(&self, start: usize) -> Token {
        let mut chars = self.input[start + 1..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '"' => {
                    return Token { start, end: start + 1 + offset + 1, kind: TokenKind::String };
                }
                '\\' => {
                    chars.next();
                }
                _ => {}
            }
        }
        Token { start, end: self.input.len(), kind: TokenKind::Error }
    }

    fn scan_while(&self, start: usize, accept: impl Fn(char) -> bool) -> usize {
        let rest = &self.input[start..];
        rest.char_indices()
            .find(|&(_, ch)| !accept(ch))
            .map_or(self.input.len(), |(offset, _)| start + offset)
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}
