use crate::diagnostics::LexErrorKind;
use logos::Logos;
use serde::Serialize;

/// Error produced inside a logos callback. `at` is relative to the start of the
/// offending token; the caller rebases it onto the source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LexFault {
    pub reason: LexErrorKind,
    pub at: usize,
}

impl LexFault {
    fn new(reason: LexErrorKind, at: usize) -> Self {
        Self { reason, at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    Line,
    Block,
    Doc,
}

/// Coarse category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Literal,
    Punctuation,
    Operator,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\x0C]+")]
#[logos(error = LexFault)]
pub enum TokenKind {
    // Keywords
    #[token("abstract")]
    Abstract,
    #[token("assert")]
    Assert,
    #[token("boolean")]
    Boolean,
    #[token("break")]
    Break,
    #[token("byte")]
    Byte,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("char")]
    Char,
    #[token("class")]
    Class,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("do")]
    Do,
    #[token("double")]
    Double,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("float")]
    Float,
    #[token("for")]
    For,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("implements")]
    Implements,
    #[token("import")]
    Import,
    #[token("instanceof")]
    Instanceof,
    #[token("int")]
    Int,
    #[token("interface")]
    Interface,
    #[token("long")]
    Long,
    #[token("native")]
    Native,
    #[token("new")]
    New,
    #[token("package")]
    Package,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("public")]
    Public,
    #[token("return")]
    Return,
    #[token("short")]
    Short,
    #[token("static")]
    Static,
    #[token("strictfp")]
    Strictfp,
    #[token("super")]
    Super,
    #[token("switch")]
    Switch,
    #[token("synchronized")]
    Synchronized,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("transient")]
    Transient,
    #[token("try")]
    Try,
    #[token("void")]
    Void,
    #[token("volatile")]
    Volatile,
    #[token("while")]
    While,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"[0-9][0-9_]*")]
    IntLit,

    #[regex(r"0[xX][0-9a-fA-F_]+[lL]")]
    #[regex(r"0[bB][01_]+[lL]")]
    #[regex(r"[0-9][0-9_]*[lL]")]
    LongLit,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]")]
    #[regex(r"[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]")]
    FloatLit,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9][0-9_]*)?[dD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[dD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[dD]?")]
    #[regex(r"[0-9][0-9_]*[dD]")]
    DoubleLit,

    #[token("\"", string_literal)]
    StringLit(String),

    #[token("'", char_literal)]
    CharLit(String),

    // Identifiers
    #[regex(r"[a-zA-Z_$\x{80}-\x{10FFFF}][a-zA-Z0-9_$\x{80}-\x{10FFFF}]*")]
    Ident,

    // Operators
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<<")]
    Shl,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    // `>>`, `>>>` and their compound forms are assembled by the parser.
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("->")]
    Arrow,
    #[token("::")]
    ColonColon,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("@")]
    At,

    // Comments, moved to a side list by the lexer
    #[regex(r"//[^\n]*", |_| CommentKind::Line)]
    #[token("/*", block_comment)]
    Comment(CommentKind),
}

impl TokenKind {
    pub fn class(&self) -> TokenClass {
        use TokenKind::*;
        match self {
            IntLit | LongLit | FloatLit | DoubleLit | StringLit(_) | CharLit(_) | True | False
            | Null => TokenClass::Literal,
            Ident => TokenClass::Identifier,
            LParen | RParen | LBrace | RBrace | LBracket | RBracket | Semi | Comma | Colon | Dot
            | Ellipsis | At | Comment(_) => TokenClass::Punctuation,
            Eq | PlusEq | MinusEq | StarEq | SlashEq | PercentEq | AmpEq | PipeEq | CaretEq
            | ShlEq | PlusPlus | Plus | MinusMinus | Minus | Star | Slash | Percent | EqEq
            | BangEq | Shl | Lt | LtEq | Gt | GtEq | Amp | Pipe | Caret | Tilde | AmpAmp
            | PipePipe | Bang | Question | Arrow | ColonColon => TokenClass::Operator,
            _ => TokenClass::Keyword,
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.class() == TokenClass::Keyword
    }
}

/// Returns true if the given string is a reserved Java word, including the
/// literal words `true`, `false` and `null`.
pub fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "abstract" | "assert" | "boolean" | "break" | "byte" | "case" | "catch" | "char"
            | "class" | "const" | "continue" | "default" | "do" | "double" | "else" | "enum"
            | "extends" | "final" | "finally" | "float" | "for" | "goto" | "if"
            | "implements" | "import" | "instanceof" | "int" | "interface" | "long"
            | "native" | "new" | "package" | "private" | "protected" | "public" | "return"
            | "short" | "static" | "strictfp" | "super" | "switch" | "synchronized" | "this"
            | "throw" | "throws" | "transient" | "try" | "void" | "volatile" | "while"
            | "true" | "false" | "null"
    )
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> Result<CommentKind, LexFault> {
    let rest = lex.remainder();
    let kind = if rest.starts_with('*') && !rest.starts_with("*/") {
        CommentKind::Doc
    } else {
        CommentKind::Block
    };
    match rest.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(kind)
        }
        None => Err(LexFault::new(LexErrorKind::UnterminatedComment, 0)),
    }
}

fn string_literal(lex: &mut logos::Lexer<TokenKind>) -> Result<String, LexFault> {
    let rest = lex.remainder();
    let unterminated = LexFault::new(LexErrorKind::UnterminatedString, 0);
    let mut units = Vec::new();
    let mut i = 0;
    loop {
        let Some(c) = rest[i..].chars().next() else {
            return Err(unterminated);
        };
        match c {
            '"' => {
                lex.bump(i + 1);
                return Ok(String::from_utf16_lossy(&units));
            }
            '\n' | '\r' => return Err(unterminated),
            '\\' if i + 1 == rest.len() => return Err(unterminated),
            '\\' => {
                // +1 for the opening quote
                i += decode_escape(&rest[i..], &mut units)
                    .ok_or(LexFault::new(LexErrorKind::InvalidEscape, i + 1))?;
            }
            c => {
                let mut buf = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut buf));
                i += c.len_utf8();
            }
        }
    }
}

fn char_literal(lex: &mut logos::Lexer<TokenKind>) -> Result<String, LexFault> {
    let rest = lex.remainder();
    let unterminated = LexFault::new(LexErrorKind::UnterminatedChar, 0);
    let mut units = Vec::new();
    let len = match rest.chars().next() {
        None | Some('\n') | Some('\r') => return Err(unterminated),
        Some('\'') => return Err(LexFault::new(LexErrorKind::EmptyChar, 0)),
        Some('\\') if rest.len() == 1 => return Err(unterminated),
        Some('\\') => decode_escape(rest, &mut units)
            .ok_or(LexFault::new(LexErrorKind::InvalidEscape, 1))?,
        Some(c) => {
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
            c.len_utf8()
        }
    };
    if rest[len..].starts_with('\'') {
        lex.bump(len + 1);
        Ok(String::from_utf16_lossy(&units))
    } else {
        Err(unterminated)
    }
}

/// Decode one escape sequence at the start of `s` (which begins with `\`) into
/// UTF-16 units. Returns the number of bytes consumed.
fn decode_escape(s: &str, out: &mut Vec<u16>) -> Option<usize> {
    let b = s.as_bytes();
    let simple = match b.get(1)? {
        b'b' => Some(0x08),
        b't' => Some(0x09),
        b'n' => Some(0x0A),
        b'f' => Some(0x0C),
        b'r' => Some(0x0D),
        b's' => Some(0x20),
        b'"' => Some(0x22),
        b'\'' => Some(0x27),
        b'\\' => Some(0x5C),
        _ => None,
    };
    if let Some(unit) = simple {
        out.push(unit);
        return Some(2);
    }
    match b[1] {
        first @ b'0'..=b'7' => {
            // \0 through \377
            let max = if first <= b'3' { 3 } else { 2 };
            let mut value = u16::from(first - b'0');
            let mut len = 1;
            while len < max {
                match b.get(1 + len) {
                    Some(d @ b'0'..=b'7') => {
                        value = value * 8 + u16::from(d - b'0');
                        len += 1;
                    }
                    _ => break,
                }
            }
            out.push(value);
            Some(1 + len)
        }
        b'u' => {
            let mut j = 1;
            while b.get(j) == Some(&b'u') {
                j += 1;
            }
            let hex = s.get(j..j + 4)?;
            if !hex.bytes().all(|h| h.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u16::from_str_radix(hex, 16).ok()?);
            Some(j + 4)
        }
        _ => None,
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TokenKind::Abstract => "abstract",
            TokenKind::Assert => "assert",
            TokenKind::Boolean => "boolean",
            TokenKind::Break => "break",
            TokenKind::Byte => "byte",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Char => "char",
            TokenKind::Class => "class",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Do => "do",
            TokenKind::Double => "double",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Extends => "extends",
            TokenKind::Final => "final",
            TokenKind::Finally => "finally",
            TokenKind::Float => "float",
            TokenKind::For => "for",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Implements => "implements",
            TokenKind::Import => "import",
            TokenKind::Instanceof => "instanceof",
            TokenKind::Int => "int",
            TokenKind::Interface => "interface",
            TokenKind::Long => "long",
            TokenKind::Native => "native",
            TokenKind::New => "new",
            TokenKind::Package => "package",
            TokenKind::Private => "private",
            TokenKind::Protected => "protected",
            TokenKind::Public => "public",
            TokenKind::Return => "return",
            TokenKind::Short => "short",
            TokenKind::Static => "static",
            TokenKind::Strictfp => "strictfp",
            TokenKind::Super => "super",
            TokenKind::Switch => "switch",
            TokenKind::Synchronized => "synchronized",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::Throws => "throws",
            TokenKind::Transient => "transient",
            TokenKind::Try => "try",
            TokenKind::Void => "void",
            TokenKind::Volatile => "volatile",
            TokenKind::While => "while",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::IntLit => "integer literal",
            TokenKind::LongLit => "long literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::DoubleLit => "double literal",
            TokenKind::StringLit(_) => "string literal",
            TokenKind::CharLit(_) => "character literal",
            TokenKind::Ident => "identifier",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::PlusPlus => "++",
            TokenKind::Plus => "+",
            TokenKind::MinusMinus => "--",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Shl => "<<",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Question => "?",
            TokenKind::Arrow => "->",
            TokenKind::ColonColon => "::",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semi => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::At => "@",
            TokenKind::Comment(_) => "comment",
        };
        f.write_str(text)
    }
}
