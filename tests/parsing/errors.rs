#[cfg(test)]
mod syntax {
    use std::path::Path;

    use fpseq::language::{ErrorKind, ParsingError, Position};
    use fpseq::parsing;

    /// Helper function to check if parsing produces the expected error type
    fn expect_error(content: &str, expected: ParsingError) {
        let result = parsing::parse(Path::new("test.fpseq"), content);
        match result {
            Ok(_) => panic!(
                "Expected parsing to fail, but it succeeded for input: {}",
                content
            ),
            Err(error) => {
                if std::mem::discriminant(&error.cause) != std::mem::discriminant(&expected) {
                    panic!(
                        "Expected error type like {:?} but got: {:?} for input '{}'",
                        expected, error.cause, content
                    );
                }
            }
        }
    }

    fn at(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn missing_sequence_name() {
        let content = "SEQ\n  [10] COMMAND ping\n";
        let error = parsing::parse(Path::new("test.fpseq"), content).unwrap_err();

        assert_eq!(error.cause, ParsingError::InvalidInstruction(at(1, 1)));
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.line, 1);
        assert_eq!(error.code, "SEQ");
        assert_eq!(error.filename, "test.fpseq");
    }

    #[test]
    fn unexpected_character() {
        let content = "SEQ a\n  [10] COMMAND ping @\n";
        let error = parsing::parse(Path::new("test.fpseq"), content).unwrap_err();

        assert_eq!(error.cause, ParsingError::UnexpectedCharacter(at(2, 21), '@'));
        assert_eq!(error.kind(), ErrorKind::Lexical);
        assert_eq!(error.column, 21);
        assert_eq!(error.code, "  [10] COMMAND ping @");
    }

    #[test]
    fn unterminated_string() {
        expect_error(
            "SEQ a\n  [10] COMMAND say \"hello\n",
            ParsingError::UnterminatedString(at(0, 0)),
        );
        expect_error(
            "SEQ a\n  [0:10] EXPECT EVENT x re\"^abc",
            ParsingError::UnterminatedString(at(0, 0)),
        );
    }

    #[test]
    fn unrecognized_lines() {
        expect_error("SEQ a b\n", ParsingError::InvalidInstruction(at(0, 0)));
        expect_error(
            "SEQ a\n  [10] PING x\n",
            ParsingError::InvalidInstruction(at(0, 0)),
        );
        expect_error(
            "SEQ a\n  [-10] COMMAND x\n",
            ParsingError::InvalidInstruction(at(0, 0)),
        );
        expect_error(
            "SEQ a\n  [10] EXPECT EVENT x\n",
            ParsingError::InvalidInstruction(at(0, 0)),
        );
        expect_error(
            "SEQ a\n  [10] UPLINK \"only_one\"\n",
            ParsingError::InvalidInstruction(at(0, 0)),
        );
        expect_error(
            "seq a\n",
            ParsingError::InvalidInstruction(at(0, 0)),
        );
    }

    #[test]
    fn indented_header() {
        let error = parsing::parse(Path::new("test.fpseq"), "SEQ a\n  SEQ b\n").unwrap_err();

        assert_eq!(error.cause, ParsingError::IndentedHeader(at(2, 3)));
        assert_eq!(error.kind(), ErrorKind::Structural);
    }

    #[test]
    fn instruction_before_header() {
        expect_error(
            "  [10] COMMAND ping\nSEQ a\n",
            ParsingError::OutsideSequence(at(0, 0)),
        );
    }

    #[test]
    fn indentation_too_deep() {
        let content = "SEQ a\n  [10] COMMAND ping\n      [20] COMMAND pong\n";
        let error = parsing::parse(Path::new("test.fpseq"), content).unwrap_err();

        assert_eq!(
            error.cause,
            ParsingError::InvalidIndentation {
                position: at(3, 7),
                level: 3,
                deepest: 2
            }
        );
    }

    #[test]
    fn undeclared_reference() {
        let content = "SEQ a\n  [10] RUNSEQ nowhere\n";
        let error = parsing::parse(Path::new("test.fpseq"), content).unwrap_err();

        assert_eq!(
            error.cause,
            ParsingError::UndeclaredSequence(at(2, 3), "nowhere".to_string())
        );
        assert_eq!(error.code, "  [10] RUNSEQ nowhere");
    }

    #[test]
    fn self_inclusion() {
        expect_error(
            "SEQ a\n  RUNSEQ a\n",
            ParsingError::CircularInclusion(at(0, 0), vec![]),
        );
    }

    #[test]
    fn mutual_inclusion() {
        let content = "SEQ a\n  RUNSEQ b\nSEQ b\n  RUNSEQ a\n";
        let error = parsing::parse(Path::new("test.fpseq"), content).unwrap_err();

        assert_eq!(
            error.cause,
            ParsingError::CircularInclusion(
                at(4, 3),
                vec!["a".to_string(), "b".to_string(), "a".to_string()]
            )
        );
        assert_eq!(
            error.problem,
            "circular sequence inclusion a -> b -> a"
        );
    }

    #[test]
    fn longer_cycle() {
        expect_error(
            "SEQ a\n  RUNSEQ b\nSEQ b\n  RUNSEQ c\nSEQ c\n  [5] RUNSEQ a\n",
            ParsingError::CircularInclusion(at(0, 0), vec![]),
        );
    }

    #[test]
    fn times_past_the_largest_offset() {
        let content = "SEQ a\n  [18446744073709551615] COMMAND x\n    [10] COMMAND y\n";
        let error = parsing::parse(Path::new("test.fpseq"), content).unwrap_err();

        assert_eq!(error.cause, ParsingError::TimeOverflow(at(3, 5)));
        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.code, "    [10] COMMAND y");

        expect_error(
            "SEQ a\n  [18446744073709551615] RUNSEQ b\nSEQ b\n  [1] COMMAND x\n",
            ParsingError::TimeOverflow(at(0, 0)),
        );
    }

    #[test]
    fn diagnostic_rendering() {
        let content = "SEQ\n";
        let error = parsing::parse(Path::new("demo.fpseq"), content).unwrap_err();

        assert_eq!(error.to_string(), "error: demo.fpseq:1:1 invalid instruction");

        let details = error.full_details();
        assert!(details.starts_with("syntax error: invalid instruction\ndemo.fpseq:1:1"));
        assert!(details.contains("  1 | SEQ"));
    }
}
