//! Request validation helpers.

use validator::Validate;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;

/// Run the derived validators and flatten failures into one message.
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request.validate().map_err(|errors| {
        let mut problems: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|e| match e.message.as_deref() {
                        Some(message) => message.to_string(),
                        None => format!("{field} is invalid ({})", e.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        problems.sort();
        AppError::validation(problems.join("; "))
    })
}

/// Trim a required text field, rejecting blank input.
pub fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyhub_core::error::ErrorKind;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(url(message = "URL is malformed"))]
        url: String,
    }

    #[test]
    fn test_validate_request_collects_messages() {
        let err = validate_request(&Probe {
            name: String::new(),
            url: "not a url".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Name is required; URL is malformed");
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("Name", "  Grammar ").unwrap(), "Grammar");
        assert!(required_text("Name", "   ").is_err());
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" notes ")).as_deref(), Some("notes"));
    }
}
