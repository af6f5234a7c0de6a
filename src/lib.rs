//! Parsing of fpseq timed test sequences: commands to send, events and
//! telemetry to expect within time windows, files to uplink, and other
//! sequences to include.

pub mod error;
pub mod language;
pub mod output;
pub mod parsing;
