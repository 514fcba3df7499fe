//! End-to-end tokenization with the expression grammar

use assert_matches::assert_matches;
use lexstream::logging::{self, codes, MemoryLogger};
use lexstream::{
    CompiledPattern, ExpressionGrammar as G, Grammar, Lexer, LexerError, PatternError,
    PatternOptions, Token, TokenType,
};
use std::sync::Arc;
use std::thread;

fn summary(tokens: &[Token]) -> Vec<(TokenType, &str, usize)> {
    tokens
        .iter()
        .map(|t| (t.token_type(), t.text(), t.offset()))
        .collect()
}

#[test]
fn assignment_tokenizes_with_offsets() {
    let mut lexer = Lexer::new(G::new()).unwrap();
    lexer.set_input("a=1+ 2").unwrap();

    assert_eq!(
        summary(lexer.stream().tokens()),
        vec![
            (G::IDENT, "a", 0),
            (G::EQ, "=", 1),
            (G::INT, "1", 2),
            (G::PLUS, "+", 3),
            (G::INT, "2", 5),
        ]
    );

    let stream = lexer.stream_mut();
    assert_eq!(stream.current_index(), Some(0));
    assert_eq!(stream.forward_to(G::INT).map(Token::text), Some("1"));
    assert_eq!(stream.current_index(), Some(2));
}

#[test]
fn matches_reconstruct_the_input() {
    let input = "total = price * (1 + rate) ; // done\n  name = \"x\\\"y\"";
    let pattern = G::new().compile().unwrap();
    let matches = pattern.scan(input).unwrap();

    let rebuilt: String = matches.iter().map(|m| m.text).collect();
    assert_eq!(rebuilt, input);

    let mut expected_offset = 0;
    for m in &matches {
        assert_eq!(m.offset, expected_offset);
        expected_offset = m.end();
    }
}

#[test]
fn offsets_are_strictly_increasing() {
    let tokens = Lexer::new(G::new())
        .unwrap()
        .tokenize("f(x, 2.5) { y = \"s\"; } // c\n z - 3")
        .unwrap();

    assert!(tokens.windows(2).all(|w| w[0].offset() < w[1].offset()));
    assert!(tokens.iter().all(Token::is_classified));
}

#[test]
fn empty_input_gives_exhausted_stream() {
    let mut lexer = Lexer::new(G::new()).unwrap();
    lexer.set_input("").unwrap();

    let stream = lexer.stream_mut();
    stream.reset();
    assert!(stream.is_empty());
    assert!(!stream.is_valid());
    assert_eq!(stream.current_token(), None);
}

#[test]
fn whitespace_only_input_gives_empty_stream() {
    let mut lexer = Lexer::new(G::new()).unwrap();
    lexer.set_input("  \n\t ").unwrap();
    assert!(lexer.stream().is_empty());
    assert_eq!(lexer.metrics().skipped_spans, 1);
}

#[test]
fn failed_input_leaves_empty_stream() {
    let mut lexer = Lexer::new(G::new()).unwrap();
    lexer.set_input("a = 1").unwrap();
    assert_eq!(lexer.stream().len(), 3);

    let result = lexer.set_input("a = 1 # 2");
    assert_matches!(
        result,
        Err(LexerError::Pattern(PatternError::UnmatchedInput { offset: 6, ref fragment })) if fragment == "#"
    );
    assert!(lexer.stream().is_empty());
    assert!(!lexer.stream().is_valid());
}

#[test]
fn unterminated_string_is_unmatched() {
    let lexer = Lexer::new(G::new()).unwrap();
    let error = lexer.tokenize("s = \"open").unwrap_err();

    assert_eq!(error.offset(), Some(4));
    assert_eq!(error.error_code(), codes::lexical::UNMATCHED_INPUT);
}

#[test]
fn literal_names_come_from_the_grammar() {
    let lexer = Lexer::new(G::new()).unwrap();
    assert_eq!(lexer.literal(G::IDENT), "Expression::IDENT");
    assert_eq!(lexer.literal(G::SEMICOLON), "Expression::SEMICOLON");
    assert_eq!(lexer.literal(TokenType::new(999)), "999");
}

#[test]
fn compiled_pattern_is_shared_across_threads() {
    let pattern = Arc::new(G::new().compile().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pattern = Arc::clone(&pattern);
            thread::spawn(move || {
                let mut lexer = Lexer::with_pattern(G::new(), pattern);
                lexer.set_input(format!("x{i} = {i} + y")).unwrap();
                lexer.into_stream().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 5);
    }
}

struct Broken;

impl Grammar for Broken {
    fn name(&self) -> &'static str {
        "Broken"
    }

    fn catchable_patterns(&self) -> Vec<String> {
        Vec::new()
    }

    fn non_catchable_patterns(&self) -> Vec<String> {
        vec![r"\s+".to_string()]
    }

    fn classify(&self, _token: &mut Token) {}
}

#[test]
fn grammar_without_rules_is_rejected() {
    assert_matches!(
        Lexer::new(Broken).map(|_| ()),
        Err(LexerError::Pattern(PatternError::EmptyRuleSet))
    );
}

#[test]
fn case_sensitive_options_are_honoured() {
    let pattern = CompiledPattern::compile(
        &["[a-z]+"],
        &[r"\s+"],
        PatternOptions::default().case_sensitive(),
    )
    .unwrap();
    assert!(pattern.scan("abc def").is_ok());
    assert!(pattern.scan("abc DEF").is_err());
}

#[test]
fn tokenization_is_logged() {
    let memory = Arc::new(MemoryLogger::new());

    logging::with_scoped_logger(memory.clone(), || {
        let mut lexer = Lexer::new(G::new()).unwrap();
        lexer.set_input("a = 1").unwrap();
        let _ = lexer.set_input("a = $");
    });

    assert!(memory.has_success_with_code(codes::success::PATTERN_COMPILED));
    assert!(memory.has_success_with_code(codes::success::TOKENIZATION_COMPLETE));

    let errors = memory.get_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::lexical::UNMATCHED_INPUT);
    assert_eq!(errors[0].offset, Some(4));
}
