//! Inlining referenced sequences and closing open expectation windows

use std::collections::HashMap;

use tracing::debug;

use super::parser::Draft;
use crate::language::{ParsingError, Sequence, Sequences};

/// Largest number of instructions a single sequence may hold once every
/// reference in it has been inlined. Each RUNSEQ copies the whole of the
/// sequence it names, so a short file can otherwise describe an enormous
/// one.
pub const EXPANSION_LIMIT: usize = 1_000_000;

/// Flatten and bound every sequence of the draft, in declaration order.
pub fn resolve(draft: &Draft) -> Result<Sequences, ParsingError> {
    resolve_within(draft, EXPANSION_LIMIT)
}

/// As [`resolve`], failing once any sequence would grow past `limit`
/// instructions.
pub fn resolve_within(draft: &Draft, limit: usize) -> Result<Sequences, ParsingError> {
    let mut resolved = Sequences::new();
    let mut done = HashMap::new();

    for sequence in &draft.sequences {
        if !done.contains_key(&sequence.name) {
            let mut path = Vec::new();
            let flattened = flatten(sequence, draft, &mut path, &mut done, limit)?;
            done.insert(
                sequence
                    .name
                    .clone(),
                flattened,
            );
        }

        let mut flattened = match done.get(&sequence.name) {
            Some(flattened) => flattened.clone(),
            None => continue,
        };
        flattened.bound();

        debug!(
            sequence = %flattened.name,
            duration = flattened.duration(),
            commands = flattened
                .commands
                .len(),
            "Resolved"
        );
        resolved.insert(flattened);
    }

    Ok(resolved)
}

/// A copy of `sequence` with everything it references merged in at the
/// reference's offset, depth first. `path` holds the names currently being
/// expanded; meeting one of them again is a cycle. `done` holds sequences
/// already flattened, so each is expanded only once however often it is
/// referenced. Only complete results go in there, which keeps every name on
/// `path` out of it.
pub fn flatten(
    sequence: &Sequence,
    draft: &Draft,
    path: &mut Vec<String>,
    done: &mut HashMap<String, Sequence>,
    limit: usize,
) -> Result<Sequence, ParsingError> {
    path.push(
        sequence
            .name
            .clone(),
    );

    let mut result = sequence.clone();

    for directive in draft.directives(&sequence.name) {
        let name = &directive
            .reference
            .name;

        if path
            .iter()
            .any(|expanding| expanding == name)
        {
            let mut chain = path.clone();
            chain.push(name.clone());
            return Err(ParsingError::CircularInclusion(directive.position, chain));
        }

        if !done.contains_key(name) {
            let included = match draft
                .sequences
                .get(name)
            {
                Some(included) => included,
                None => {
                    return Err(ParsingError::UndeclaredSequence(
                        directive.position,
                        name.clone(),
                    ))
                }
            };

            let flattened = flatten(included, draft, path, done, limit)?;
            done.insert(name.clone(), flattened);
        }

        let included = match done.get(name) {
            Some(included) => included,
            None => continue,
        };

        if result
            .len()
            .saturating_add(included.len())
            > limit
        {
            return Err(ParsingError::ExpansionLimit {
                position: directive.position,
                name: name.clone(),
                limit,
            });
        }

        result
            .merge(
                included,
                directive
                    .reference
                    .offset,
            )
            .map_err(|_| ParsingError::TimeOverflow(directive.position))?;
    }

    path.pop();
    Ok(result)
}
