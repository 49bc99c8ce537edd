//! Input validation functions
//!
//! Profile form input is checked with the `validator` derive macros and then
//! mapped into [`ProfileValidationError`], which lists every failing field
//! rather than only the first one.

use crate::countries::is_known_country;
use crate::models::UserProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Minimum accepted body weight in kilograms
pub const MIN_WEIGHT_KG: f64 = 30.0;

/// Minimum accepted height in centimeters
pub const MIN_HEIGHT_CM: f64 = 120.0;

/// Profile fields in form order, used to report errors deterministically
pub const PROFILE_FIELDS: &[&str] = &[
    "name", "age", "sex", "weight", "height", "goals", "country",
];

/// Raw profile form input as entered by the user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RawProfile {
    #[validate(length(min = 3, max = 30))]
    pub name: String,
    #[validate(range(min = 11))]
    pub age: i64,
    #[validate(length(min = 3))]
    pub sex: String,
    #[validate(range(min = 30.0), custom(function = "validate_finite"))]
    pub weight: f64,
    #[validate(range(min = 120.0), custom(function = "validate_finite"))]
    pub height: f64,
    #[validate(length(min = 5))]
    pub goals: String,
    #[validate(length(min = 3), custom(function = "validate_known_country"))]
    pub country: String,
}

fn validate_finite(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("finite"))
    }
}

fn validate_known_country(country: &str) -> Result<(), validator::ValidationError> {
    // Too-short names are already reported by the length rule
    if country.chars().count() < 3 || is_known_country(country) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("known_country"))
    }
}

/// Validate raw form input into an immutable [`UserProfile`]
///
/// Either every field passes and a profile is returned, or the error lists
/// each violation with the constraint name and the offending value.
pub fn validate_profile(raw: RawProfile) -> Result<UserProfile, ProfileValidationError> {
    let mut errors = match raw.validate() {
        Ok(()) => Vec::new(),
        Err(e) => collect_field_errors(&raw, &e),
    };

    let age = u32::try_from(raw.age).ok();
    if age.is_none() && !errors.iter().any(|e| e.field == "age") {
        errors.push(FieldError::new("age", "range", serde_json::json!(raw.age)));
    }

    match age {
        Some(age) if errors.is_empty() => Ok(UserProfile::from_validated(
            raw.name,
            age,
            raw.sex,
            raw.weight,
            raw.height,
            raw.goals,
            raw.country,
        )),
        _ => {
            sort_by_form_order(&mut errors);
            Err(ProfileValidationError { errors })
        }
    }
}

/// Validate a submitted JSON form body into a [`UserProfile`]
///
/// Missing fields and values of the wrong JSON type are reported as field
/// errors (`required`, `type`) together with every other violation.
pub fn validate_profile_input(
    input: &serde_json::Value,
) -> Result<UserProfile, ProfileValidationError> {
    let mut shape_errors = Vec::new();
    let mut text = |field: &str| match input.get(field) {
        Some(serde_json::Value::String(s)) => s.clone(),
        other => {
            shape_errors.push(shape_error(field, other));
            String::new()
        }
    };
    let name = text("name");
    let sex = text("sex");
    let goals = text("goals");
    let country = text("country");

    let age = match input.get("age").and_then(serde_json::Value::as_i64) {
        Some(n) => n,
        None => {
            shape_errors.push(shape_error("age", input.get("age")));
            0
        }
    };
    let mut number = |field: &str| match input.get(field).and_then(serde_json::Value::as_f64) {
        Some(n) => n,
        None => {
            shape_errors.push(shape_error(field, input.get(field)));
            0.0
        }
    };
    let weight = number("weight");
    let height = number("height");

    let raw = RawProfile {
        name,
        age,
        sex,
        weight,
        height,
        goals,
        country,
    };

    match validate_profile(raw) {
        Ok(profile) if shape_errors.is_empty() => Ok(profile),
        result => {
            let mut errors = result.err().map(|e| e.errors).unwrap_or_default();
            // Placeholder values must not produce a second error for the same field
            errors.retain(|e| !shape_errors.iter().any(|s| s.field == e.field));
            errors.extend(shape_errors);
            sort_by_form_order(&mut errors);
            Err(ProfileValidationError { errors })
        }
    }
}

fn shape_error(field: &str, value: Option<&serde_json::Value>) -> FieldError {
    match value {
        None | Some(serde_json::Value::Null) => {
            FieldError::new(field, "required", serde_json::Value::Null)
        }
        Some(v) => FieldError::new(field, "type", v.clone()),
    }
}

fn collect_field_errors(raw: &RawProfile, errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        let value = raw_value(raw, &field);
        for err in field_errors.iter() {
            out.push(FieldError::new(&field, &err.code, value.clone()));
        }
    }
    out
}

fn raw_value(raw: &RawProfile, field: &str) -> serde_json::Value {
    match field {
        "name" => serde_json::json!(raw.name),
        "age" => serde_json::json!(raw.age),
        "sex" => serde_json::json!(raw.sex),
        // Non-finite floats have no JSON form
        "weight" => serde_json::json!(raw.weight),
        "height" => serde_json::json!(raw.height),
        "goals" => serde_json::json!(raw.goals),
        "country" => serde_json::json!(raw.country),
        _ => serde_json::Value::Null,
    }
}

fn sort_by_form_order(errors: &mut [FieldError]) {
    let position = |field: &str| {
        PROFILE_FIELDS
            .iter()
            .position(|f| *f == field)
            .unwrap_or(PROFILE_FIELDS.len())
    };
    errors.sort_by(|a, b| {
        position(&a.field)
            .cmp(&position(&b.field))
            .then_with(|| a.constraint.cmp(&b.constraint))
    });
}

/// Explain a failed constraint in plain words
fn constraint_message(field: &str, constraint: &str) -> String {
    match (field, constraint) {
        ("name", "length") => "must be between 3 and 30 characters".to_string(),
        ("age", "range") => "must be greater than 10".to_string(),
        ("weight", "range") => format!("must be at least {} kg", MIN_WEIGHT_KG),
        ("height", "range") => format!("must be at least {} cm", MIN_HEIGHT_CM),
        ("goals", "length") => "must be at least 5 characters".to_string(),
        (_, "length") => "must be at least 3 characters".to_string(),
        (_, "finite") => "must be a valid number".to_string(),
        (_, "required") => "is required".to_string(),
        ("age", "type") => "must be a whole number".to_string(),
        ("weight" | "height", "type") => "must be a number".to_string(),
        (_, "type") => "must be text".to_string(),
        (_, "known_country") => "must be a recognized country name".to_string(),
        _ => format!("failed {} check", constraint),
    }
}

/// Validate a logged body weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < MIN_WEIGHT_KG {
        return Err(format!("Weight must be at least {} kg", MIN_WEIGHT_KG));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Name",
        "age" => "Age",
        "sex" => "Sex",
        "weight" => "Weight",
        "height" => "Height",
        "goals" => "Fitness Goals",
        "country" => "Country",
        "mood" => "Energy Level",
        "intensity" => "Workout Intensity",
        "image" => "Equipment Photo",
        _ => field_name,
    }
}

/// A single failed field constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub constraint: String,
    pub value: serde_json::Value,
    pub message: String,
    pub display_label: String,
}

impl FieldError {
    pub fn new(field: &str, constraint: &str, value: serde_json::Value) -> Self {
        Self {
            field: field.to_string(),
            constraint: constraint.to_string(),
            value,
            message: constraint_message(field, constraint),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Every constraint the submitted profile violated
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileValidationError {
    pub errors: Vec<FieldError>,
}

impl ProfileValidationError {
    /// Names of the failing fields, in form order, without repeats
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for e in &self.errors {
            if !fields.contains(&e.field.as_str()) {
                fields.push(&e.field);
            }
        }
        fields
    }
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(FieldError::user_message).collect();
        write!(f, "Invalid profile: {}", messages.join("; "))
    }
}

impl std::error::Error for ProfileValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::COUNTRY_NAMES;
    use proptest::prelude::*;
    use rstest::rstest;

    fn alex() -> RawProfile {
        RawProfile {
            name: "Alex".to_string(),
            age: 29,
            sex: "Male".to_string(),
            weight: 70.0,
            height: 175.0,
            goals: "lose fat".to_string(),
            country: "Canada".to_string(),
        }
    }

    #[test]
    fn test_valid_profile() {
        let profile = validate_profile(alex()).unwrap();
        assert_eq!(profile.name(), "Alex");
        assert_eq!(profile.age(), 29);
        assert_eq!(profile.sex(), "Male");
        assert_eq!(profile.weight(), 70.0);
        assert_eq!(profile.height(), 175.0);
        assert_eq!(profile.goals(), "lose fat");
        assert_eq!(profile.country(), "Canada");
    }

    #[test]
    fn test_short_name_identified() {
        let raw = RawProfile {
            name: "Al".to_string(),
            age: 25,
            ..alex()
        };
        let err = validate_profile(raw).unwrap_err();
        assert_eq!(err.fields(), vec!["name"]);
        assert_eq!(err.errors[0].constraint, "length");
        assert_eq!(err.errors[0].value, serde_json::json!("Al"));
    }

    #[rstest]
    #[case::name_too_long(RawProfile { name: "x".repeat(31), ..alex() }, "name")]
    #[case::age_ten(RawProfile { age: 10, ..alex() }, "age")]
    #[case::age_negative(RawProfile { age: -4, ..alex() }, "age")]
    #[case::sex_short(RawProfile { sex: "M".into(), ..alex() }, "sex")]
    #[case::weight_low(RawProfile { weight: 29.9, ..alex() }, "weight")]
    #[case::weight_nan(RawProfile { weight: f64::NAN, ..alex() }, "weight")]
    #[case::height_low(RawProfile { height: 119.0, ..alex() }, "height")]
    #[case::goals_short(RawProfile { goals: "run".into(), ..alex() }, "goals")]
    #[case::country_short(RawProfile { country: "UK".into(), ..alex() }, "country")]
    #[case::country_unknown(RawProfile { country: "Atlantis".into(), ..alex() }, "country")]
    fn test_single_violation_identifies_field(#[case] raw: RawProfile, #[case] field: &str) {
        let err = validate_profile(raw).unwrap_err();
        assert_eq!(err.fields(), vec![field]);
    }

    #[test]
    fn test_boundaries_accepted() {
        let raw = RawProfile {
            name: "Bob".into(),
            age: 11,
            sex: "Other".into(),
            weight: 30.0,
            height: 120.0,
            goals: "tone!".into(),
            country: "viet nam".into(),
        };
        assert!(validate_profile(raw).is_ok());
    }

    #[test]
    fn test_multiple_violations_all_reported_in_form_order() {
        let raw = RawProfile {
            name: "Al".into(),
            age: 5,
            sex: "Male".into(),
            weight: 10.0,
            height: 175.0,
            goals: "x".into(),
            country: "Nowhere".into(),
        };
        let err = validate_profile(raw).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "age", "weight", "goals", "country"]);
        let country = err.errors.iter().find(|e| e.field == "country").unwrap();
        assert_eq!(country.constraint, "known_country");
        assert!(err.to_string().contains("Fitness Goals: must be at least 5 characters"));
    }

    #[test]
    fn test_input_with_wrong_type_reports_every_field() {
        let input = serde_json::json!({
            "name": "Al",
            "age": "29",
            "sex": "Male",
            "weight": 70.0,
            "height": 175,
            "goals": "lose fat",
            "country": "Canada"
        });
        let err = validate_profile_input(&input).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "age"]);
        let age = &err.errors[1];
        assert_eq!(age.constraint, "type");
        assert_eq!(age.value, serde_json::json!("29"));
        assert_eq!(age.user_message(), "Age: must be a whole number");
    }

    #[test]
    fn test_input_missing_fields_are_required() {
        let err = validate_profile_input(&serde_json::json!({ "name": "Al" })).unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["name", "age", "sex", "weight", "height", "goals", "country"]
        );
        assert!(err.errors[1..].iter().all(|e| e.constraint == "required"));
    }

    #[test]
    fn test_input_valid_object_accepted() {
        let input = serde_json::to_value(alex()).unwrap();
        let profile = validate_profile_input(&input).unwrap();
        assert_eq!(profile.name(), "Alex");
        assert_eq!(profile.height(), 175.0);
    }

    #[test]
    fn test_non_object_input_rejected() {
        let err = validate_profile_input(&serde_json::json!([1, 2])).unwrap_err();
        assert_eq!(err.errors.len(), PROFILE_FIELDS.len());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(30.0).is_ok());
        assert!(validate_weight(29.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("goals"), "Fitness Goals");
        assert_eq!(get_field_display_label("mood"), "Energy Level");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    #[test]
    fn test_field_error_user_message() {
        let err = FieldError::new("height", "range", serde_json::json!(100.0));
        assert_eq!(err.display_label, "Height");
        assert_eq!(err.user_message(), "Height: must be at least 120 cm");
    }

    fn valid_raw_profile() -> impl Strategy<Value = RawProfile> {
        (
            "[A-Za-z]{3,30}",
            11i64..120,
            prop::sample::select(vec!["Male", "Female", "Other"]),
            30.0f64..250.0,
            120.0f64..230.0,
            "[a-z ]{5,40}",
            prop::sample::select(COUNTRY_NAMES.to_vec()),
        )
            .prop_map(|(name, age, sex, weight, height, goals, country)| RawProfile {
                name,
                age,
                sex: sex.to_string(),
                weight,
                height,
                goals,
                country: country.to_string(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_input_round_trips(raw in valid_raw_profile()) {
            let profile = validate_profile(raw.clone());
            prop_assert!(profile.is_ok(), "expected valid: {:?}", raw);
            let profile = profile.unwrap();
            prop_assert_eq!(profile.name(), raw.name.as_str());
            prop_assert_eq!(i64::from(profile.age()), raw.age);
            prop_assert_eq!(profile.sex(), raw.sex.as_str());
            prop_assert_eq!(profile.weight(), raw.weight);
            prop_assert_eq!(profile.height(), raw.height);
            prop_assert_eq!(profile.goals(), raw.goals.as_str());
            prop_assert_eq!(profile.country(), raw.country.as_str());
        }

        #[test]
        fn prop_low_weight_always_reported(raw in valid_raw_profile(), weight in 0.0f64..30.0) {
            let err = validate_profile(RawProfile { weight, ..raw }).unwrap_err();
            prop_assert_eq!(err.fields(), vec!["weight"]);
        }

        #[test]
        fn prop_low_age_and_height_both_reported(
            raw in valid_raw_profile(),
            age in -100i64..=10,
            height in 0.0f64..120.0
        ) {
            let err = validate_profile(RawProfile { age, height, ..raw }).unwrap_err();
            prop_assert_eq!(err.fields(), vec!["age", "height"]);
        }
    }
}
