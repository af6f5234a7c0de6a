//! Listing of resolved sequences for the check command

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::debug;

use crate::language::Sequence;

static TEMPLATE: &str = r#"{{ for sequence in sequences }}
{sequence.number}. {sequence.header}
  duration: {sequence.duration} ms
  commands:
{{ for line in sequence.commands }}    {line}
{{ endfor }}  uplinks:
{{ for line in sequence.uplinks }}    {line}
{{ endfor }}  events:
{{ for line in sequence.events }}    {line}
{{ endfor }}  telemetry:
{{ for line in sequence.telemetry }}    {line}
{{ endfor }}{{ endfor }}"#;

#[derive(Serialize)]
struct Entry {
    number: usize,
    header: String,
    duration: u64,
    commands: Vec<String>,
    uplinks: Vec<String>,
    events: Vec<String>,
    telemetry: Vec<String>,
}

#[derive(Serialize)]
struct Context {
    sequences: Vec<Entry>,
}

fn entry(number: usize, sequence: &Sequence) -> Entry {
    let header = if sequence.is_test {
        format!("TEST SEQ {}", sequence.name)
    } else {
        format!("SEQ {}", sequence.name)
    };

    Entry {
        number,
        header,
        duration: sequence.duration(),
        commands: sequence
            .ordered_commands()
            .iter()
            .map(|command| command.to_string())
            .collect(),
        uplinks: sequence
            .ordered_uplinks()
            .iter()
            .map(|uplink| uplink.to_string())
            .collect(),
        events: sequence
            .events
            .iter()
            .map(|event| event.to_string())
            .collect(),
        telemetry: sequence
            .telemetry
            .iter()
            .map(|telemetry| telemetry.to_string())
            .collect(),
    }
}

/// Render the given sequences, numbered from 1, with commands and uplinks
/// in the order they will be sent.
pub fn check_report<'a, I>(sequences: I) -> Result<String, tinytemplate::error::Error>
where
    I: IntoIterator<Item = &'a Sequence>,
{
    let context = Context {
        sequences: sequences
            .into_iter()
            .enumerate()
            .map(|(i, sequence)| entry(i + 1, sequence))
            .collect(),
    };
    debug!("Rendering {} sequences", context.sequences.len());

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("check", TEMPLATE)?;

    tt.render("check", &context)
}
