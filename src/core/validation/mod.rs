//! Declarative input validation for menu payloads
//!
//! Payloads are serialized to JSON and every registered field validator runs
//! against its field. All failures are collected into one
//! [`ValidationError::FieldErrors`].

pub mod validators;

use crate::core::error::{FieldValidationError, UpmsResult, ValidationError};
use crate::core::menu::{MenuPatch, NewMenu};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Maximum length of `menu_code` and `menu_name`
pub const MAX_NAME_LENGTH: usize = 100;

type FieldValidator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Ordered set of field validators for one payload shape
#[derive(Clone, Default)]
pub struct ValidationConfig {
    validators: Vec<(String, FieldValidator)>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validator<F>(mut self, field: &str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push((field.to_string(), Arc::new(validator)));
        self
    }

    /// Rules applied to [`NewMenu`]
    pub fn for_create() -> Self {
        Self::new()
            .add_validator("menu_code", validators::required())
            .add_validator("menu_code", validators::string_length(1, MAX_NAME_LENGTH))
            .add_validator("menu_name", validators::required())
            .add_validator("menu_name", validators::string_length(1, MAX_NAME_LENGTH))
            .add_validator("parent_id", validators::non_negative())
    }

    /// Rules applied to [`MenuPatch`]; absent fields are skipped
    pub fn for_update() -> Self {
        Self::new()
            .add_validator("menu_code", validators::string_length(1, MAX_NAME_LENGTH))
            .add_validator("menu_name", validators::string_length(1, MAX_NAME_LENGTH))
            .add_validator("parent_id", validators::non_negative())
    }

    /// Run every validator against `payload`
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let errors: Vec<FieldValidationError> = self
            .validators
            .iter()
            .filter_map(|(field, validator)| {
                let value = payload.get(field).unwrap_or(&Value::Null);
                validator(field, value)
                    .err()
                    .map(|message| FieldValidationError {
                        field: field.clone(),
                        message,
                    })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }

    fn validate_serialized<T: Serialize>(&self, payload: &T) -> UpmsResult<()> {
        let value = serde_json::to_value(payload)?;
        self.validate(&value)?;
        Ok(())
    }
}

/// Validate a creation payload
pub fn validate_new_menu(menu: &NewMenu) -> UpmsResult<()> {
    ValidationConfig::for_create().validate_serialized(menu)
}

/// Validate a sparse update payload
pub fn validate_patch(patch: &MenuPatch) -> UpmsResult<()> {
    ValidationConfig::for_update().validate_serialized(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::UpmsError;

    #[test]
    fn test_valid_new_menu() {
        assert!(validate_new_menu(&NewMenu::new("sys", "System")).is_ok());
    }

    #[test]
    fn test_blank_fields_are_collected() {
        let err = validate_new_menu(&NewMenu::new("", " ")).unwrap_err();
        match err {
            UpmsError::Validation(ValidationError::FieldErrors(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"menu_code"));
                assert!(fields.contains(&"menu_name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_too_long_code() {
        let code = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_new_menu(&NewMenu::new(code, "System")).is_err());
    }

    #[test]
    fn test_negative_parent_rejected() {
        let menu = NewMenu::new("sys", "System").with_parent(-4);
        assert!(validate_new_menu(&menu).is_err());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        assert!(validate_patch(&MenuPatch::new(1)).is_ok());
        assert!(validate_patch(&MenuPatch::new(1).menu_code("")).is_err());
    }
}
