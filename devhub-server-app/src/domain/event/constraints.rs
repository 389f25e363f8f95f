//! Field constraints for candidate events.
//!
//! Length and presence rules are declared on [`EventDraft`] with `validator`
//! and converted into domain [`ValidationError`]s here. Mode is checked by
//! parsing into [`EventMode`], so the caller gets the typed value back.

use validator::Validate;

use crate::domain::event::{EventDraft, EventMode, ValidationError};

/// Rejects missing or whitespace-only text.
pub fn required(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

/// Checks every declared constraint and reports all violations at once.
pub fn check_constraints(draft: &EventDraft) -> Result<EventMode, Vec<ValidationError>> {
    let mut errors = match draft.validate() {
        Ok(()) => Vec::new(),
        Err(e) => into_domain_errors(e),
    };

    let mode = if draft.mode.trim().is_empty() {
        errors.push(ValidationError::new("mode", "Mode is required"));
        None
    } else {
        match draft.mode.parse::<EventMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                errors.push(ValidationError::new("mode", e.to_string()));
                None
            }
        }
    };

    match mode {
        Some(mode) if errors.is_empty() => Ok(mode),
        _ => Err(errors),
    }
}

fn into_domain_errors(errors: validator::ValidationErrors) -> Vec<ValidationError> {
    let mut out = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        for e in field_errors.iter() {
            let message = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid ({})", field, e.code));
            out.push(ValidationError::new(field.clone(), message));
        }
    }
    out
}
