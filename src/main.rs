use std::path::Path;

use clap::{Arg, ArgAction, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fpseq::language::Sequence;
use fpseq::{output, parsing};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("fpseq")
        .version(VERSION)
        .propagate_version(true)
        .about("Timed test sequences of commands, expected events and telemetry.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debugging information to standard error."),
        )
        .subcommand(
            Command::new("check")
                .about("Syntax check the given sequence file and list the sequences it resolves to")
                .arg(
                    Arg::new("test")
                        .long("test")
                        .value_name("NAME")
                        .help("Only list the sequence with the given name."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the sequences you want to check."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let filename = match submatches.get_one::<String>("filename") {
                Some(filename) => Path::new(filename),
                None => {
                    eprintln!("error: no sequence file given");
                    std::process::exit(1);
                }
            };
            let test = submatches.get_one::<String>("test");

            debug!(?filename, ?test);
            check(filename, test.map(String::as_str));
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: fpseq [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn check(filename: &Path, test: Option<&str>) {
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("error: {}: {}", filename.display(), error.problem);
            std::process::exit(1);
        }
    };

    let sequences = match parsing::parse(filename, &content) {
        Ok(sequences) => sequences,
        Err(error) => {
            eprintln!("{}", error.full_details());
            std::process::exit(1);
        }
    };

    let selected: Vec<&Sequence> = match test {
        Some(name) => match sequences.get(name) {
            Some(sequence) => vec![sequence],
            None => {
                eprintln!(
                    "error: no sequence named {} in {}",
                    name,
                    filename.display()
                );
                std::process::exit(1);
            }
        },
        None => sequences
            .iter()
            .collect(),
    };

    println!("Syntax check OK");

    match output::check_report(selected) {
        Ok(report) => print!("{}", report),
        Err(error) => {
            eprintln!("error: {}", error);
            std::process::exit(1);
        }
    }
}
