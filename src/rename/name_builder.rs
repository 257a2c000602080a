use std::collections::HashMap;

use tracing::debug;

use crate::formatter::{apply_pipeline, RenamerState};
use crate::history::{RenameLog, RenameLogEntry, RenameWarning};
use crate::property::{build_variables, Property, VariableMap};
use crate::template::{Token, TokenKind};

/// Result of building a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameBuildResult {
    pub name: String,
    pub warnings: Vec<RenameWarning>,
}

/// Walk the token stream and substitute variables.
///
/// An undeclared variable contributes nothing and yields `PropertyMissing`. A
/// declared variable bound to an empty string yields `PropertyValueEmpty` and
/// still runs through its formatters.
pub fn generate_name(
    variables: &VariableMap,
    tokens: &[Token],
    state: &RenamerState,
) -> NameBuildResult {
    let mut name = String::new();
    let mut warnings = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Literal => name.push_str(&token.value),
            TokenKind::Property => {
                let Some(value) = variables.get(&token.value) else {
                    debug!(property = %token.value, "Property is not declared");
                    warnings.push(RenameWarning::PropertyMissing(token.value.clone()));
                    continue;
                };

                if value.is_empty() {
                    debug!(property = %token.value, "Property value is empty");
                    warnings.push(RenameWarning::PropertyValueEmpty(token.value.clone()));
                }

                name.push_str(&apply_pipeline(&token.formatters, value, state));
            }
        }
    }

    NameBuildResult { name, warnings }
}

/// Compute the new name of every file in batch order, then flag collisions
pub fn plan_names(properties: &[Property], tokens: &[Token], file_names: &[&str]) -> RenameLog {
    let mut log: RenameLog = file_names
        .iter()
        .enumerate()
        .map(|(index, file_name)| {
            let state = RenamerState::new(index, file_name);
            let variables = build_variables(&state, properties);
            let built = generate_name(&variables, tokens, &state);

            debug!("Naming \"{}\" as \"{}\"", file_name, built.name);

            RenameLogEntry {
                original_file_name: file_name.to_string(),
                new_file_name: built.name,
                warnings: built.warnings,
                collisions: Vec::new(),
            }
        })
        .collect();

    detect_collisions(&mut log);
    log
}

/// Group entries by new name. Every member of a group with two or more entries
/// gets the full, sorted index list of the group; everyone else gets none.
pub fn detect_collisions(log: &mut [RenameLogEntry]) {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, entry) in log.iter().enumerate() {
        groups
            .entry(entry.new_file_name.clone())
            .or_default()
            .push(idx);
    }

    for group in groups.into_values() {
        let collisions = if group.len() > 1 {
            debug!(indices = ?group, "Collision detected");
            group.clone()
        } else {
            Vec::new()
        };
        for idx in group {
            log[idx].collisions = collisions.clone();
        }
    }
}
