#[cfg(test)]
mod verify {
    use std::path::Path;

    use fpseq::language::*;
    use fpseq::parsing::{self, Parser};

    fn trim(s: &str) -> &str {
        s.strip_prefix('\n')
            .unwrap_or(s)
    }

    fn resolve(content: &str) -> Sequences {
        let mut input = Parser::new("test.fpseq", content);
        input
            .parse()
            .unwrap_or_else(|e| panic!("Failed to parse: {}", e))
    }

    #[test]
    fn single_command() {
        let sequences = resolve("SEQ s\n  [10] COMMAND ping\n");

        assert_eq!(sequences.len(), 1);
        let sequence = sequences
            .get("s")
            .unwrap();
        assert_eq!(
            sequence,
            &Sequence {
                name: "s".to_string(),
                is_test: false,
                commands: vec![Command {
                    name: "ping".to_string(),
                    offset: 10,
                    args: vec![],
                }],
                events: vec![],
                telemetry: vec![],
                uplinks: vec![],
            }
        );
        assert_eq!(sequence.duration(), 10);
    }

    #[test]
    fn zero_offsets_stay_zero() {
        let sequences = resolve(trim(
            r#"
SEQ s
  [0] COMMAND a
    [0] COMMAND b
      [0:] EXPECT EVENT c
        RUNSEQ t
SEQ t
  COMMAND d
"#,
        ));

        let s = sequences
            .get("s")
            .unwrap();
        assert!(s
            .commands
            .iter()
            .all(|command| command.offset == 0));
        assert_eq!(s.events[0].window.start, 0);
        assert_eq!(s.duration(), 0);
    }

    #[test]
    fn dedent_then_resume() {
        let sequences = resolve(trim(
            r#"
SEQ s
  [100] COMMAND parent
    [10] COMMAND child
      [5] COMMAND grandchild
        [1] COMMAND great_grandchild
    [20] COMMAND second_child
  [300] COMMAND sibling
"#,
        ));

        let s = sequences
            .get("s")
            .unwrap();
        let offsets: Vec<(&str, u64)> = s
            .commands
            .iter()
            .map(|command| (command.name.as_str(), command.offset))
            .collect();
        assert_eq!(
            offsets,
            vec![
                ("parent", 100),
                ("child", 110),
                ("grandchild", 115),
                ("great_grandchild", 116),
                ("second_child", 120),
                ("sibling", 300),
            ]
        );
    }

    #[test]
    fn expectations_open_scopes_at_their_start() {
        let sequences = resolve(trim(
            r#"
SEQ s
  [100:200] EXPECT EVENT armed
    [50] COMMAND fire
"#,
        ));

        let s = sequences
            .get("s")
            .unwrap();
        assert_eq!(s.commands[0].offset, 150);
        assert_eq!(s.duration(), 200);
    }

    #[test]
    fn inclusion_adds_offsets() {
        let sequences = resolve(trim(
            r#"
SEQ A
  [100] RUNSEQ B
SEQ B
  [50] COMMAND X
"#,
        ));

        let a = sequences
            .get("A")
            .unwrap();
        assert_eq!(
            a.commands,
            vec![Command {
                name: "X".to_string(),
                offset: 150,
                args: vec![],
            }]
        );
    }

    #[test]
    fn reference_before_declaration() {
        let sequences = resolve(trim(
            r#"
TEST SEQ main
  [10] RUNSEQ later
SEQ later
  [5] UPLINK "a.bin" "/b.bin"
"#,
        ));

        let main = sequences
            .get("main")
            .unwrap();
        assert!(main.is_test);
        assert_eq!(main.uplinks[0].offset, 15);
    }

    #[test]
    fn open_windows_run_to_the_end() {
        let sequences = resolve(trim(
            r#"
SEQ s
  [:] EXPECT EVENT anything
  [100:] EXPECT NO TELEMETRY chan "0"
  [500] COMMAND done
"#,
        ));

        let s = sequences
            .get("s")
            .unwrap();
        assert_eq!(s.duration(), 500);
        assert_eq!(
            s.events[0].window,
            Window {
                start: 0,
                end: Bound::Bounded(500)
            }
        );
        assert_eq!(
            s.telemetry[0].window,
            Window {
                start: 100,
                end: Bound::Bounded(500)
            }
        );
        assert!(s.telemetry[0].negated);
    }

    #[test]
    fn expected_value_flags() {
        let sequences = resolve(trim(
            r#"
SEQ s
  [0:10] EXPECT EVENT a re"^ERR"
  [0:10] EXPECT EVENT b "ERR"
  [0:20] EXPECT NO EVENT Fault
"#,
        ));

        let s = sequences
            .get("s")
            .unwrap();
        assert_eq!(
            s.events[0].expected,
            Some(ExpectedValue {
                text: "^ERR".to_string(),
                is_regex: true
            })
        );
        assert_eq!(
            s.events[1].expected,
            Some(ExpectedValue {
                text: "ERR".to_string(),
                is_regex: false
            })
        );
        assert_eq!(
            s.events[2],
            ExpectEvent {
                name: "Fault".to_string(),
                window: Window {
                    start: 0,
                    end: Bound::Bounded(20)
                },
                expected: None,
                negated: true,
            }
        );
    }

    #[test]
    fn redeclaration_replaces() {
        let sequences = resolve(trim(
            r#"
SEQ a
  [10] COMMAND old
SEQ b
  [1] COMMAND other
TEST SEQ a
  [20] COMMAND new
"#,
        ));

        let names: Vec<&str> = sequences
            .names()
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let a = sequences
            .get("a")
            .unwrap();
        assert!(a.is_test);
        assert_eq!(a.commands.len(), 1);
        assert_eq!(a.commands[0].name, "new");
    }

    #[test]
    fn last_line_without_newline() {
        let sequences = resolve("SEQ s\n  [7] COMMAND ping");

        assert_eq!(
            sequences
                .get("s")
                .unwrap()
                .commands[0]
                .offset,
            7
        );
    }

    #[test]
    fn comments_and_blank_lines() {
        let sequences = resolve(trim(
            r##"
# header comment

SEQ s # trailing comment
  # indented comment

  [10] COMMAND ping "#not a comment"
"##,
        ));

        let s = sequences
            .get("s")
            .unwrap();
        assert_eq!(s.commands[0].args, vec!["#not a comment".to_string()]);
    }

    #[test]
    fn empty_file() {
        let sequences = resolve("");
        assert!(sequences.is_empty());
    }

    #[test]
    fn parse_entry_point() {
        let content = "TEST SEQ t\n  [5] COMMAND go \"now\"\n";
        let sequences = parsing::parse(Path::new("test.fpseq"), content).unwrap();

        let t = sequences
            .get("t")
            .unwrap();
        assert_eq!(t.commands[0].to_string(), r#"[5] COMMAND go "now""#);
    }
}
