use std::fs;
use std::path::{Path, PathBuf};

use fpseq::parsing;

fn fpseq_files(dir: &Path) -> Vec<PathBuf> {
    assert!(dir.exists(), "{:?} directory missing", dir);

    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("fpseq")
        {
            files.push(path);
        }
    }

    assert!(!files.is_empty(), "No .fpseq files found in {:?}", dir);
    files
}

#[test]
fn ensure_samples_parse() {
    let files = fpseq_files(Path::new("tests/samples/"));

    let mut failures = Vec::new();

    for file in &files {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        match parsing::parse(&file, &content) {
            Ok(_) => {}
            Err(e) => {
                println!("File {:?} failed to parse: {}", file, e);
                failures.push(file.clone());
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "Sample files should parse successfully, but {} files failed",
            failures.len()
        );
    }
}

#[test]
fn ensure_broken_fail() {
    let files = fpseq_files(Path::new("tests/broken/"));

    let mut unexpected_successes = Vec::new();

    for file in &files {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        match parsing::parse(&file, &content) {
            Ok(_) => {
                println!("File {:?} unexpectedly parsed successfully", file);
                unexpected_successes.push(file.clone());
            }
            Err(_) => {}
        }
    }

    if !unexpected_successes.is_empty() {
        panic!(
            "Broken files should not to parse successfully, but {} files passed",
            unexpected_successes.len()
        );
    }
}

#[test]
fn nested_sample_resolves() {
    let file = Path::new("tests/samples/nested.fpseq");
    let content = parsing::load(file).expect("Failed to load nested sample");
    let sequences = parsing::parse(file, &content).expect("Failed to parse nested sample");

    let names: Vec<&str> = sequences
        .names()
        .collect();
    assert_eq!(names, vec!["power_on", "warm_up", "observation"]);

    let tests: Vec<&str> = sequences
        .tests()
        .map(|sequence| sequence.name.as_str())
        .collect();
    assert_eq!(tests, vec!["observation"]);

    let observation = sequences
        .get("observation")
        .unwrap();

    let commands: Vec<(&str, u64)> = observation
        .ordered_commands()
        .iter()
        .map(|command| (command.name.as_str(), command.offset))
        .collect();
    assert_eq!(
        commands,
        vec![
            ("eps.SWITCH_ON", 0),
            ("payload.HEATER", 200),
            ("payload.OBSERVE", 2000)
        ]
    );
    assert_eq!(observation.duration(), 5000);

    // the uplink's open window runs to the end of the whole observation
    let received = observation
        .events
        .iter()
        .find(|event| event.name == "fileUplink.FileReceived")
        .unwrap();
    assert_eq!(received.window.start, 1100);
    assert_eq!(received.window.end_ms(), Some(5000));
}

#[test]
fn missing_file() {
    let result = parsing::load(Path::new("tests/samples/does_not_exist.fpseq"));
    assert_eq!(
        result
            .unwrap_err()
            .problem,
        "File not found"
    );
}
