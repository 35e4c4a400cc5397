#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use jparse::parser::{parse_with, ParseOptions};

/// Token choices biased toward Java structure, so the parser gets past the
/// first few tokens more often than with raw bytes.
#[derive(Arbitrary, Debug)]
enum FuzzToken {
    Ident,
    IntLit,
    DoubleLit,
    StringLit,
    Plus,
    Minus,
    Star,
    Lt,
    Gt,
    Eq,
    Arrow,
    Question,
    Colon,
    Dot,
    Comma,
    Semi,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Class,
    Int,
    Void,
    New,
    Return,
    If,
    Else,
    Switch,
    Case,
    Default,
    Yield,
    Annotation,
}

impl FuzzToken {
    fn lexeme(&self) -> &'static str {
        match self {
            FuzzToken::Ident => "x",
            FuzzToken::IntLit => "42",
            FuzzToken::DoubleLit => "3.14",
            FuzzToken::StringLit => "\"s\"",
            FuzzToken::Plus => "+",
            FuzzToken::Minus => "-",
            FuzzToken::Star => "*",
            FuzzToken::Lt => "<",
            FuzzToken::Gt => ">",
            FuzzToken::Eq => "=",
            FuzzToken::Arrow => "->",
            FuzzToken::Question => "?",
            FuzzToken::Colon => ":",
            FuzzToken::Dot => ".",
            FuzzToken::Comma => ",",
            FuzzToken::Semi => ";",
            FuzzToken::LeftParen => "(",
            FuzzToken::RightParen => ")",
            FuzzToken::LeftBrace => "{",
            FuzzToken::RightBrace => "}",
            FuzzToken::LeftBracket => "[",
            FuzzToken::RightBracket => "]",
            FuzzToken::Class => "class",
            FuzzToken::Int => "int",
            FuzzToken::Void => "void",
            FuzzToken::New => "new",
            FuzzToken::Return => "return",
            FuzzToken::If => "if",
            FuzzToken::Else => "else",
            FuzzToken::Switch => "switch",
            FuzzToken::Case => "case",
            FuzzToken::Default => "default",
            FuzzToken::Yield => "yield",
            FuzzToken::Annotation => "@A",
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzTokens {
    tokens: Vec<FuzzToken>,
    recover: bool,
}

fuzz_target!(|input: FuzzTokens| {
    // Wrap in a class body so member and statement paths get exercised.
    let body: Vec<&str> = input.tokens.iter().map(FuzzToken::lexeme).collect();
    let source = format!("class F {{ void m() {{ {} }} }}", body.join(" "));
    let Ok(lexed) = jparse::lexer::tokenize(&source) else { return };

    let options = ParseOptions { recover: input.recover, deadline: None };
    let Ok(result) = parse_with(&lexed.tokens, &source, &options) else { return };
    if result.errors.is_empty() {
        // Whatever parses must normalize to text that parses to the same text.
        let once = jparse::pretty::normalize(&result.ast);
        let twice = jparse::normalize_source(&once).expect("normalized output must parse");
        assert_eq!(once, twice);
    }
});
