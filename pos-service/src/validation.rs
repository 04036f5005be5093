use common_http_errors::{ApiError, ApiResult};

/// Reject a request whose body is missing required fields, naming every
/// absent field. Runs before authorization and before any persistence read.
pub fn check_required(fields: &[(&'static str, bool)]) -> ApiResult<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing_fields(&missing))
    }
}

/// Unwrap a required field after [`check_required`] has vetted the body.
pub fn require<T>(field: &'static str, value: Option<T>) -> ApiResult<T> {
    value.ok_or_else(|| missing_fields(&[field]))
}

pub fn missing_fields(names: &[&'static str]) -> ApiError {
    ApiError::BadRequest {
        code: "missing_fields",
        trace_id: None,
        message: Some(format!("Missing fields: {}", names.join(", "))),
    }
}

/// Non-empty after trimming; used for names and other free-text identifiers.
pub fn non_blank(field: &'static str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::BadRequest {
            code: "blank_field",
            trace_id: None,
            message: Some(format!("Field '{field}' must be a non-empty string")),
        })
    } else {
        Ok(())
    }
}

/// Numeric fields documented as non-negative (e.g. display_order).
pub fn non_negative(field: &'static str, value: i32) -> ApiResult<()> {
    if value < 0 {
        Err(ApiError::BadRequest {
            code: "negative_value",
            trace_id: None,
            message: Some(format!("Field '{field}' must be a non-negative integer")),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_required_lists_every_missing_field() {
        let err = check_required(&[("email", false), ("password", true), ("first_name", false)])
            .expect_err("two fields missing");
        match err {
            ApiError::BadRequest { code, message, .. } => {
                assert_eq!(code, "missing_fields");
                let message = message.expect("message");
                assert!(message.contains("email"));
                assert!(message.contains("first_name"));
                assert!(!message.contains("password"));
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn check_required_passes_when_all_present() {
        check_required(&[("name", true), ("price", true)]).expect("complete body");
    }

    #[test]
    fn non_blank_rejects_whitespace() {
        assert!(non_blank("name", "   ").is_err());
        non_blank("name", "Espresso").expect("real name");
    }

    #[test]
    fn non_negative_rejects_below_zero() {
        assert!(non_negative("display_order", -1).is_err());
        non_negative("display_order", 0).expect("zero is fine");
    }
}
