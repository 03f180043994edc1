use num_bigint::BigInt;

use wspace::program::Instruction::*;
use wspace::program::{Label, ParseError, Parser};

// ============================================================================
// Instruction decoding
// ============================================================================

#[test]
fn test_decode_simple_program() {
    let program = parse("SSSTL TLST LLL").unwrap();
    assert_eq!(
        program.instructions(),
        &[PUSH(BigInt::from(1)), OUTNUM, END]
    );
}

#[test]
fn test_decode_every_class() {
    let program = parse("SSSTL SLS TSSS TTS TLST LSSL LTL LLL").unwrap();
    assert_eq!(
        program.instructions(),
        &[
            PUSH(BigInt::from(1)),
            DUP,
            ADD,
            STORE,
            OUTNUM,
            MARK(Label::new(String::new())),
            RET,
            END
        ]
    );
}

#[test]
fn test_decode_negative_immediate() {
    let program = parse("STSTTSTL LLL").unwrap();
    assert_eq!(
        program.instructions(),
        &[COPY(BigInt::from(-5)), END]
    );
}

// ============================================================================
// Label table
// ============================================================================

#[test]
fn test_label_addresses_following_instruction() {
    let program = parse("SSSTL LSSSL TLST LLL").unwrap();
    assert_eq!(program.target(&Label::new("0".to_string())), Some(2));
}

#[test]
fn test_forward_and_backward_references_resolve() {
    let program = parse("LSSSL SSSTL LSSTL LLL").unwrap();
    assert_eq!(program.target(&Label::new("0".to_string())), Some(1));
    assert_eq!(program.target(&Label::new("1".to_string())), Some(3));
}

#[test]
fn test_empty_label_is_distinct() {
    // The empty label and the label "0" may coexist.
    let program = parse("LSSL LSSSL LLL").unwrap();
    assert_eq!(program.target(&Label::new(String::new())), Some(1));
    assert_eq!(program.target(&Label::new("0".to_string())), Some(2));
}

#[test]
fn test_undeclared_label_is_not_a_parse_error() {
    // Jumps to unknown labels are resolved at jump time, not here.
    let program = parse("LSLSL LLL").unwrap();
    assert_eq!(program.target(&Label::new("0".to_string())), None);
}

#[test]
fn test_trailing_mark_addresses_one_past_the_end() {
    let program = parse("LSSSL").unwrap();
    assert_eq!(program.len(), 1);
    assert_eq!(program.target(&Label::new("0".to_string())), Some(1));
}

#[test]
fn test_repeated_label() {
    assert_eq!(
        parse("LSSSL LSSSL").unwrap_err(),
        ParseError::RepeatedLabel(Label::new("0".to_string()))
    );
}

#[test]
fn test_repeated_empty_label() {
    assert_eq!(
        parse("LSSL LSSL").unwrap_err(),
        ParseError::RepeatedLabel(Label::new(String::new()))
    );
}

// ============================================================================
// Malformed programs
// ============================================================================

#[test]
fn test_truncated_stack_class() {
    assert_eq!(parse("S").unwrap_err(), ParseError::InvalidStackOp);
    assert_eq!(parse("ST").unwrap_err(), ParseError::InvalidStackOp);
    assert_eq!(parse("SL").unwrap_err(), ParseError::InvalidStackOp);
}

#[test]
fn test_unknown_stack_op() {
    assert_eq!(parse("STT").unwrap_err(), ParseError::InvalidStackOp);
}

#[test]
fn test_truncated_imp() {
    assert_eq!(parse("T").unwrap_err(), ParseError::UnknownImp);
}

#[test]
fn test_unknown_arithmetic_op() {
    // Tab-linefeed is not an arithmetic operation.
    assert_eq!(parse("TSTL").unwrap_err(), ParseError::InvalidArithmeticOp);
    assert_eq!(parse("TSL").unwrap_err(), ParseError::InvalidArithmeticOp);
}

#[test]
fn test_unknown_heap_op() {
    assert_eq!(parse("TTL").unwrap_err(), ParseError::InvalidHeapOp);
}

#[test]
fn test_unknown_io_op() {
    assert_eq!(parse("TLSL").unwrap_err(), ParseError::InvalidIoOp);
    assert_eq!(parse("TLL").unwrap_err(), ParseError::InvalidIoOp);
}

#[test]
fn test_unknown_flow_op() {
    assert_eq!(parse("LLS").unwrap_err(), ParseError::InvalidFlowOp);
    assert_eq!(parse("LLT").unwrap_err(), ParseError::InvalidFlowOp);
    assert_eq!(parse("L").unwrap_err(), ParseError::InvalidFlowOp);
}

#[test]
fn test_number_with_leading_terminator() {
    assert_eq!(parse("SSL").unwrap_err(), ParseError::InvalidNumber);
}

#[test]
fn test_unterminated_number() {
    assert_eq!(parse("SS").unwrap_err(), ParseError::InvalidNumber);
    assert_eq!(parse("SSSTST").unwrap_err(), ParseError::InvalidNumber);
}

#[test]
fn test_unterminated_label() {
    assert_eq!(parse("LSSSS").unwrap_err(), ParseError::InvalidLabel);
}

// ============================================================================
// Helpers
// ============================================================================

/// Translate a readable S/T/L transcription into program text and
/// parse it.  Whitespace in the transcription is purely visual
/// grouping.
fn parse(text: &str) -> Result<wspace::program::Program, ParseError> {
    let text: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'S' => ' ',
            'T' => '\t',
            'L' => '\n',
            _ => panic!("invalid transcription character: {c}"),
        })
        .collect();
    Parser::new(&text).parse()
}
