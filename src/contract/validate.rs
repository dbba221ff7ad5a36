//! Field rules shared by the input types.

use crate::types::errors::ContractError;

pub(crate) fn non_empty(field: &str, value: &str) -> Result<(), ContractError> {
    if value.trim().is_empty() {
        return Err(ContractError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn order(value: i32) -> Result<(), ContractError> {
    if value < 0 {
        return Err(ContractError::Validation(format!(
            "order must be non-negative, got {}",
            value
        )));
    }
    Ok(())
}

pub(crate) fn http_url(value: &str) -> Result<(), ContractError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ContractError::Validation(
            "invalid url: must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn ordered_ids(ids: &[String]) -> Result<(), ContractError> {
    for id in ids {
        non_empty("orderedIds entry", id)?;
    }
    Ok(())
}
