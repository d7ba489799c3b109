//! Validation Utilities

use validator::{Validate, ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    AppError::InvalidFields(field_errors)
}

/// Validate a request body, converting failures into `AppError`.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(validation_error)
}

/// Slugs are lowercase ASCII words joined by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if well_formed {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some("Slug must contain lowercase letters, digits and single hyphens".into());
        Err(err)
    }
}

/// Hex colour in `#rrggbb` form.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let ok = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("color");
        err.message = Some("Color must be a hex value like #007bff".into());
        Err(err)
    }
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("suc-khoe-tong-quat" ; "hyphenated")]
    #[test_case("vitamin" ; "single word")]
    #[test_case("10-cach" ; "leading digits")]
    fn test_valid_slugs(slug: &str) {
        assert!(validate_slug(slug).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("Upper-Case" ; "uppercase")]
    #[test_case("-leading" ; "leading hyphen")]
    #[test_case("trailing-" ; "trailing hyphen")]
    #[test_case("double--hyphen" ; "double hyphen")]
    #[test_case("sức-khỏe" ; "non ascii")]
    #[test_case("with space" ; "space")]
    fn test_invalid_slugs(slug: &str) {
        assert!(validate_slug(slug).is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(validate_hex_color("#007bff").is_ok());
        assert!(validate_hex_color("#FF6B6B").is_ok());
        assert!(validate_hex_color("007bff").is_err());
        assert!(validate_hex_color("#07bf").is_err());
        assert!(validate_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("  took aspirin ").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
