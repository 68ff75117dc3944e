//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values make sense together.
//! Every problem is reported, not just the first.

use std::fmt;

use crate::config::schema::{CspTable, GateConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.session.secret_key.is_empty() {
        errors.push(ValidationError::new("session.secret_key", "must not be empty"));
    }

    let name = &config.session.cookie_name;
    if name.is_empty() || name.contains(|c: char| c == '=' || c == ';' || c.is_whitespace()) {
        errors.push(ValidationError::new(
            "session.cookie_name",
            "must be non-empty and contain no '=', ';' or whitespace",
        ));
    }

    if let Some(policy) = &config.security.csp_policy {
        check_csp_table("security.csp_policy", policy, &mut errors);
    }
    if let Some(policy) = &config.security.extend_csp_policy {
        check_csp_table("security.extend_csp_policy", policy, &mut errors);
    }

    if let (Some(start), Some(end)) = (config.game.start, config.game.end) {
        if end <= start {
            errors.push(ValidationError::new("game.end", "must be after game.start"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_csp_table(field: &str, policy: &CspTable, errors: &mut Vec<ValidationError>) {
    for (directive, sources) in policy {
        if directive.is_empty() || directive.contains(|c: char| c == ';' || c.is_whitespace()) {
            errors.push(ValidationError::new(
                field,
                format!("invalid directive name {:?}", directive),
            ));
        }
        if sources.iter().any(|s| s.contains(';')) {
            errors.push(ValidationError::new(
                format!("{}.{}", field, directive),
                "sources must not contain ';'",
            ));
        }
    }
}
