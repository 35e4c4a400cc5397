use jparse::diagnostics::LexErrorKind;
use jparse::lexer::{tokenize, tokenize_bytes, CommentKind, Lexer, TokenClass, TokenKind};
use jparse::span::Span;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).unwrap().tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_identifiers_and_punctuation() {
    let lexed = tokenize("public static void main(String[] args) {}").unwrap();
    let classes: Vec<TokenClass> = lexed.tokens.iter().map(|t| t.kind.class()).collect();
    assert_eq!(classes[0], TokenClass::Keyword);
    assert_eq!(classes[1], TokenClass::Keyword);
    assert_eq!(classes[2], TokenClass::Keyword);
    assert_eq!(lexed.tokens[3].kind, TokenKind::Ident);
    assert_eq!(lexed.tokens[3].lexeme, "main");
    assert_eq!(classes[4], TokenClass::Punctuation);
}

#[test]
fn operators_take_longest_match() {
    assert_eq!(
        kinds("a += b && c || !d ++ -- :: -> ..."),
        vec![
            TokenKind::Ident,
            TokenKind::PlusEq,
            TokenKind::Ident,
            TokenKind::AmpAmp,
            TokenKind::Ident,
            TokenKind::PipePipe,
            TokenKind::Bang,
            TokenKind::Ident,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::ColonColon,
            TokenKind::Arrow,
            TokenKind::Ellipsis,
        ]
    );
}

#[test]
fn string_escapes_are_decoded() {
    let lexed = tokenize(r#""line\nbreak A \\ \101""#).unwrap();
    assert_eq!(lexed.tokens[0].kind, TokenKind::StringLit("line\nbreak A \\ A".to_string()));
}

#[test]
fn unicode_in_identifiers_and_strings() {
    let lexed = tokenize("String café = \"naïve\";").unwrap();
    assert_eq!(lexed.tokens[1].kind, TokenKind::Ident);
    assert_eq!(lexed.tokens[1].lexeme, "café");
    assert_eq!(lexed.tokens[3].kind, TokenKind::StringLit("naïve".to_string()));
}

#[test]
fn unterminated_string_reports_offset() {
    let err = tokenize("class A { String s = \"open").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedString);
    assert_eq!(err.offset, 21);
}

#[test]
fn file_with_only_an_unterminated_string() {
    let err = tokenize("\"abc").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedString);
    assert_eq!(err.offset, 0);
}

#[test]
fn unterminated_block_comment() {
    let err = tokenize("int x; /* never closed").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedComment);
    assert_eq!(err.offset, 7);
}

#[test]
fn stray_character_is_rejected() {
    let err = tokenize("int x = 1 # 2;").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnexpectedCharacter);
    assert_eq!(err.offset, 10);
}

#[test]
fn invalid_utf8_reports_first_bad_byte() {
    let err = tokenize_bytes(b"int x\xc3(").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::InvalidUtf8);
    assert_eq!(err.offset, 5);
}

#[test]
fn comments_are_kept_on_the_side() {
    let lexed = tokenize("/** doc */ class A { // tail\n /* block */ }").unwrap();
    let comment_kinds: Vec<CommentKind> = lexed.comments.iter().map(|c| c.kind).collect();
    assert_eq!(comment_kinds, vec![CommentKind::Doc, CommentKind::Line, CommentKind::Block]);
    assert_eq!(lexed.comments[0].span, Span::new(0, 10));
    assert_eq!(lexed.tokens.len(), 4);
}

#[test]
fn lazy_lexer_stops_after_error() {
    let mut lexer = Lexer::new("a ` b");
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
    lexer.restart();
    assert_eq!(lexer.next().unwrap().unwrap().lexeme, "a");
}

#[test]
fn generic_closers_are_single_angles() {
    assert_eq!(
        kinds("List<List<String>>"),
        vec![
            TokenKind::Ident,
            TokenKind::Lt,
            TokenKind::Ident,
            TokenKind::Lt,
            TokenKind::Ident,
            TokenKind::Gt,
            TokenKind::Gt,
        ]
    );
}
