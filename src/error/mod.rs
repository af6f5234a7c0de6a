// Diagnostics presented to the user when a sequence file fails to parse

mod display;

// Re-export all public symbols
pub use display::*;
