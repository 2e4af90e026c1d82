use crate::error::{DescriptionError, Result};
use crate::ir::ProcessDescription;
use crate::layout::MarkerKind;
use std::collections::HashMap;

/// Parses a process description from JSON, falling back to JSON5 for
/// hand-authored files with comments or trailing commas.
pub fn parse_process_description(input: &str) -> Result<ProcessDescription> {
    let description = match serde_json::from_str::<ProcessDescription>(input) {
        Ok(description) => description,
        Err(json_err) => match json5::from_str::<ProcessDescription>(input) {
            Ok(description) => description,
            // Report the JSON error unless the input is clearly JSON5-only.
            Err(json5_err) if looks_like_json5(input) => return Err(json5_err.into()),
            Err(_) => return Err(json_err.into()),
        },
    };
    validate(&description)?;
    Ok(description)
}

pub fn validate(description: &ProcessDescription) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for phase in &description.phases {
        for (index, step) in phase.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(DescriptionError::EmptyStepId {
                    phase: phase.id.clone(),
                    index,
                });
            }
            if [MarkerKind::Start, MarkerKind::End]
                .iter()
                .any(|kind| kind.element_id() == step.id)
            {
                return Err(DescriptionError::ReservedStepId { id: step.id.clone() });
            }
            if let Some(first_phase) = owners.insert(step.id.as_str(), phase.id.as_str()) {
                return Err(DescriptionError::DuplicateStepId {
                    id: step.id.clone(),
                    first_phase: first_phase.to_string(),
                    second_phase: phase.id.clone(),
                });
            }
        }
    }

    for block in description.estimation_blocks() {
        for step_id in &block.step_ids {
            if !owners.contains_key(step_id.as_str()) {
                return Err(DescriptionError::UnknownBlockStep {
                    block: block.id.clone(),
                    step: step_id.clone(),
                });
            }
        }
    }
    Ok(())
}

fn looks_like_json5(input: &str) -> bool {
    input
        .lines()
        .any(|line| line.trim_start().starts_with("//"))
        || input.contains("/*")
}
