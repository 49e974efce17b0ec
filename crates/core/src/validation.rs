//! Request validation: structured results + reusable field rules.
//!
//! Request types declare their rules with `#[derive(validator::Validate)]`.
//! `validate_request` runs them and flattens the outcome into
//! `ValidationErrors`, which is what the pipeline and the API speak.

use std::borrow::Cow;

use serde::Serialize;

/// A single failed rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All failed rules for one request, ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether any rule failed for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(mut self) -> Result<(), Self> {
        if self.0.is_empty() {
            return Ok(());
        }
        self.0.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        Err(self)
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("validation failed")?;
        for (i, e) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(value: validator::ValidationErrors) -> Self {
        let mut out = ValidationErrors::new();
        for (field, errors) in value.field_errors() {
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("'{field}' is invalid ({})", error.code));
                out.push(field.to_string(), message);
            }
        }
        out
    }
}

/// Run the derived rules of `request`.
pub fn validate_request<R: validator::Validate>(request: &R) -> Result<(), ValidationErrors> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) => ValidationErrors::from(errors).into_result(),
    }
}

/// Synchronous rule check run before a request reaches its handler.
///
/// Implementations must not touch the network or storage.
pub trait RequestValidator<R>: Send + Sync {
    fn validate(&self, request: &R) -> Result<(), ValidationErrors>;
}

/// Validator for any request that derives `validator::Validate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeriveValidator;

impl<R: validator::Validate> RequestValidator<R> for DeriveValidator {
    fn validate(&self, request: &R) -> Result<(), ValidationErrors> {
        validate_request(request)
    }
}

/// Rule: string must contain something other than whitespace.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("not_blank");
        err.message = Some(Cow::Borrowed("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// Rule: tenant keys are non-empty and use lowercase ascii letters, digits,
/// `-` and `_` only.
pub fn tenant_key_format(value: &str) -> Result<(), validator::ValidationError> {
    if value.is_empty() {
        let mut err = validator::ValidationError::new("tenant_key_format");
        err.message = Some(Cow::Borrowed("'Id' must not be empty."));
        return Err(err);
    }
    let ok = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !ok {
        let mut err = validator::ValidationError::new("tenant_key_format");
        err.message = Some(Cow::Borrowed(
            "may only contain lowercase letters, digits, '-' and '_'",
        ));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(custom(function = "not_blank", message = "'Name' must not be empty."))]
        name: String,
        #[validate(custom(function = "tenant_key_format"))]
        tenant: String,
    }

    #[test]
    fn passing_request_yields_ok() {
        let s = Sample {
            name: "x".into(),
            tenant: "acme".into(),
        };
        assert!(validate_request(&s).is_ok());
    }

    #[test]
    fn failures_are_collected_per_field() {
        let s = Sample {
            name: "  ".into(),
            tenant: "Acme Inc".into(),
        };
        let errors = validate_request(&s).unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert!(errors.has_field("name"));
        assert!(errors.has_field("tenant"));
        assert_eq!(errors.errors()[0].message, "'Name' must not be empty.");
    }

    #[test]
    fn tenant_key_format_rules() {
        assert!(tenant_key_format("acme-01_b").is_ok());
        assert!(tenant_key_format("").is_err());
        assert!(tenant_key_format("Acme").is_err());
        assert!(tenant_key_format("a b").is_err());
    }

    #[test]
    fn display_lists_every_field() {
        let mut e = ValidationErrors::new();
        e.push("tenant_key", "must not be empty");
        assert_eq!(e.to_string(), "validation failed: tenant_key: must not be empty");
    }
}
