use sdlc::lexer::token::TokenKind;
use sdlc::lexer::tokenize;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|token| token.kind).collect()
}

#[test]
fn empty_input_yields_only_end_of_file() {
    assert_eq!(kinds(""), vec![TokenKind::EndOfFile]);
    assert_eq!(kinds("   \n // just a comment"), vec![TokenKind::EndOfFile]);
}

#[test]
fn every_sequence_ends_with_a_single_end_of_file() {
    for source in ["float x;", "\"open", "@#$", "shader s : vertex { }"] {
        let tokens = tokenize(source);
        let eof_count = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::EndOfFile)
            .count();
        assert_eq!(eof_count, 1, "source: {}", source);
        assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::EndOfFile));
    }
}

#[test]
fn lexes_integer_and_float_literals() {
    let tokens = tokenize("123");
    assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[0].lexeme, "123");

    let tokens = tokenize("3.14");
    assert_eq!(tokens[0].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[0].lexeme, "3.14");
}

#[test]
fn trailing_dot_is_not_part_of_a_float() {
    let tokens = tokenize("3.");
    assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[0].lexeme, "3");
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].kind, TokenKind::EndOfFile);
}

#[test]
fn unterminated_string_becomes_empty_unknown() {
    let tokens = tokenize("\"abc");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
    assert_eq!(tokens[0].lexeme, "");
}

#[test]
fn string_text_excludes_quotes() {
    let tokens = tokenize("\"hello\"");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].lexeme, "hello");
}

#[test]
fn keywords_types_and_identifiers() {
    assert_eq!(
        kinds("shader fragment uniform sampler2D samplerCube mat4 albedo true"),
        vec![
            TokenKind::Shader,
            TokenKind::Fragment,
            TokenKind::Uniform,
            TokenKind::Sampler2D,
            TokenKind::SamplerCube,
            TokenKind::Mat4,
            TokenKind::Identifier,
            TokenKind::True,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn two_character_operators_win_over_prefixes() {
    assert_eq!(
        kinds("== != <= >= && || = ! < >"),
        vec![
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Assign,
            TokenKind::Bang,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn unknown_character_does_not_stop_lexing() {
    let tokens = tokenize("a @ b");
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].lexeme, "@");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].lexeme, "b");
}

#[test]
fn tracks_line_and_column() {
    let tokens = tokenize("float x;\n  return");
    let ret = &tokens[3];
    assert_eq!(ret.kind, TokenKind::Return);
    assert_eq!((ret.line, ret.column), (2, 3));
}

#[test]
fn token_kinds_display_upper_snake_names() {
    assert_eq!(TokenKind::IntegerLiteral.to_string(), "INTEGER_LITERAL");
    assert_eq!(TokenKind::EndOfFile.to_string(), "END_OF_FILE");
}
