// src/migrate/transform.rs

//! Legacy activity → new-format activity conversion
//!
//! The correlation key (name, course, time_created) is copied verbatim;
//! everything else is validated and mapped. Any content the new format
//! cannot represent is a `TransformError`.

use crate::db::models::{H5pActivity, HvpActivity, HvpLibrary};
use crate::error::{Error, Result};
use serde_json::Value;

/// Disabled-option bits understood by both formats
pub const DISABLE_FRAME: i64 = 1;
pub const DISABLE_DOWNLOAD: i64 = 2;
pub const DISABLE_EMBED: i64 = 4;
pub const DISABLE_COPYRIGHT: i64 = 8;
pub const DISABLE_ABOUT: i64 = 16;

const KNOWN_DISPLAY_BITS: i64 =
    DISABLE_FRAME | DISABLE_DOWNLOAD | DISABLE_EMBED | DISABLE_COPYRIGHT | DISABLE_ABOUT;

/// Build the new activity for `legacy`, not yet persisted
///
/// `now` becomes the new record's modification time.
pub fn transform(legacy: &HvpActivity, library: &HvpLibrary, now: i64) -> Result<H5pActivity> {
    validate_parameters(legacy, library)?;

    Ok(H5pActivity {
        id: None,
        course_id: legacy.course_id,
        name: legacy.name.clone(),
        intro: legacy.intro.clone(),
        intro_format: legacy.intro_format,
        grade: convert_grade(legacy.max_grade)?,
        display_options: convert_display_options(legacy.disable_options)?,
        enable_tracking: true,
        time_created: legacy.time_created,
        time_modified: now,
    })
}

fn validate_parameters(legacy: &HvpActivity, library: &HvpLibrary) -> Result<()> {
    let parameters: Value = serde_json::from_str(&legacy.json_content).map_err(|e| {
        Error::TransformError(format!(
            "content parameters of '{}' are not valid JSON: {}",
            legacy.name, e
        ))
    })?;

    if !parameters.is_object() {
        return Err(Error::TransformError(format!(
            "content parameters of '{}' must be a JSON object",
            legacy.name
        )));
    }

    if library.machine_name.trim().is_empty() {
        return Err(Error::TransformError(format!(
            "main library {} has no machine name",
            library.id.unwrap_or_default()
        )));
    }

    Ok(())
}

fn convert_display_options(disable_options: i64) -> Result<i64> {
    if disable_options < 0 || disable_options & !KNOWN_DISPLAY_BITS != 0 {
        return Err(Error::TransformError(format!(
            "unsupported display options bitmask {disable_options}"
        )));
    }
    Ok(disable_options)
}

fn convert_grade(max_grade: f64) -> Result<i64> {
    if !max_grade.is_finite() || max_grade < 0.0 {
        return Err(Error::TransformError(format!(
            "maximum grade {max_grade} cannot be converted"
        )));
    }
    Ok(max_grade.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> HvpLibrary {
        let mut library = HvpLibrary::new("H5P.CoursePresentation".to_string(), 1, 24);
        library.id = Some(3);
        library
    }

    fn legacy(json: &str) -> HvpActivity {
        let mut hvp = HvpActivity::new(9, "Slides".to_string(), json.to_string(), 3, 1_234);
        hvp.id = Some(1);
        hvp
    }

    #[test]
    fn test_correlation_key_copied_verbatim() {
        let mut hvp = legacy(r#"{"presentation":{}}"#);
        hvp.name = "  Spaced name  ".to_string();
        hvp.intro = Some("<p>Intro</p>".to_string());

        let new = transform(&hvp, &library(), 9_999).unwrap();
        assert_eq!(new.name, hvp.name);
        assert_eq!(new.course_id, 9);
        assert_eq!(new.time_created, 1_234);
        assert_eq!(new.time_modified, 9_999);
        assert_eq!(new.intro.as_deref(), Some("<p>Intro</p>"));
        assert!(new.enable_tracking);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = transform(&legacy("{not json"), &library(), 0).unwrap_err();
        assert!(matches!(err, Error::TransformError(_)));
    }

    #[test]
    fn test_non_object_parameters_rejected() {
        let err = transform(&legacy("[1, 2]"), &library(), 0).unwrap_err();
        assert!(matches!(err, Error::TransformError(_)));
    }

    #[test]
    fn test_display_options_mapping() {
        let mut hvp = legacy("{}");
        hvp.disable_options = DISABLE_DOWNLOAD | DISABLE_EMBED;
        assert_eq!(transform(&hvp, &library(), 0).unwrap().display_options, 6);

        hvp.disable_options = 64;
        assert!(matches!(
            transform(&hvp, &library(), 0),
            Err(Error::TransformError(_))
        ));
    }

    #[test]
    fn test_grade_conversion() {
        let mut hvp = legacy("{}");
        hvp.max_grade = 9.6;
        assert_eq!(transform(&hvp, &library(), 0).unwrap().grade, 10);

        hvp.max_grade = -1.0;
        assert!(transform(&hvp, &library(), 0).is_err());

        hvp.max_grade = f64::NAN;
        assert!(transform(&hvp, &library(), 0).is_err());
    }
}
