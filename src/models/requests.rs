use crate::core::sanitize::{sanitize_bio, visible_text_len};
use crate::models::domain::{NewProfile, GENDERS, MARITAL_STATUSES, MARRIAGE_TIMELINES};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// Minimum visible length of a bio
pub const MIN_BIO_CHARS: usize = 150;

/// Key under which struct-level errors are reported
const STRUCT_ERRORS_KEY: &str = "__all__";

/// Field name used for the age range ordering error
pub const AGE_RANGE_FIELD: &str = "ageRange";

/// Request body of the profile submission form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_age_range", skip_on_field_errors = false))]
pub struct CreateProfileRequest {
    #[validate(custom(function = "validate_required"))]
    #[serde(alias = "redditUsername", default)]
    pub username: String,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    #[serde(default)]
    pub age: i32,
    #[validate(custom(function = "validate_gender"))]
    #[serde(default)]
    pub gender: String,
    #[validate(custom(function = "validate_required"))]
    #[serde(default)]
    pub location: String,
    #[serde(rename = "willingToRelocate", default)]
    pub willing_to_relocate: bool,
    #[serde(rename = "wantsKids", default)]
    pub wants_kids: bool,
    #[validate(range(min = 18, max = 100, message = "Minimum age must be between 18 and 100"))]
    #[serde(rename = "ageRangeMin", default)]
    pub age_range_min: i32,
    #[validate(range(min = 18, max = 100, message = "Maximum age must be between 18 and 100"))]
    #[serde(rename = "ageRangeMax", default)]
    pub age_range_max: i32,
    #[validate(custom(function = "validate_marital_status"))]
    #[serde(rename = "maritalStatus", default)]
    pub marital_status: String,
    #[validate(custom(function = "validate_marriage_timeline"))]
    #[serde(rename = "marriageTimeline", default)]
    pub marriage_timeline: String,
    #[validate(custom(function = "validate_bio"))]
    #[serde(default)]
    pub bio: String,
}

impl CreateProfileRequest {
    /// Build the insert payload, sanitizing the bio
    pub fn into_new_profile(self) -> NewProfile {
        NewProfile {
            username: self.username.trim().to_string(),
            age: self.age,
            gender: self.gender,
            location: self.location.trim().to_string(),
            willing_to_relocate: self.willing_to_relocate,
            wants_kids: self.wants_kids,
            age_range_min: self.age_range_min,
            age_range_max: self.age_range_max,
            marital_status: self.marital_status,
            marriage_timeline: self.marriage_timeline,
            bio: sanitize_bio(&self.bio),
        }
    }

    /// Validate only the fields shown on one form step
    ///
    /// Returns field name to messages; an empty map lets the form advance.
    pub fn validate_step(&self, step: FormStep) -> BTreeMap<String, Vec<String>> {
        match self.validate() {
            Ok(()) => BTreeMap::new(),
            Err(errors) => field_messages(&errors)
                .into_iter()
                .filter(|(field, _)| step.fields().contains(&field.as_str()))
                .collect(),
        }
    }
}

/// Steps of the multi-step submission form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStep {
    BasicInformation,
    Preferences,
    AboutYou,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [
        FormStep::BasicInformation,
        FormStep::Preferences,
        FormStep::AboutYou,
    ];

    /// Step from its 1-based position in the form
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(FormStep::BasicInformation),
            2 => Some(FormStep::Preferences),
            3 => Some(FormStep::AboutYou),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            FormStep::BasicInformation => 1,
            FormStep::Preferences => 2,
            FormStep::AboutYou => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormStep::BasicInformation => "Basic Information",
            FormStep::Preferences => "Preferences",
            FormStep::AboutYou => "About You",
        }
    }

    /// JSON field names validated on this step
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FormStep::BasicInformation => &[
                "username",
                "age",
                "gender",
                "location",
                "willingToRelocate",
                "maritalStatus",
            ],
            FormStep::Preferences => &[
                "ageRangeMin",
                "ageRangeMax",
                AGE_RANGE_FIELD,
                "marriageTimeline",
                "wantsKids",
            ],
            FormStep::AboutYou => &["bio"],
        }
    }
}

/// Raw listing query string
///
/// Everything arrives as text so malformed values can be ignored instead of
/// rejecting the whole request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    pub location: Option<String>,
    #[serde(rename = "userAge")]
    pub user_age: Option<String>,
    #[serde(rename = "maritalStatus")]
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    pub relocate: Option<String>,
    #[serde(rename = "marriageTimeline")]
    pub marriage_timeline: Option<String>,
    #[serde(rename = "minAge")]
    pub min_age: Option<String>,
    #[serde(rename = "maxAge")]
    pub max_age: Option<String>,
    pub kids: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    /// True when no parameter was supplied at all
    pub fn is_blank(&self) -> bool {
        self.location.is_none()
            && self.user_age.is_none()
            && self.marital_status.is_none()
            && self.gender.is_none()
            && self.relocate.is_none()
            && self.marriage_timeline.is_none()
            && self.min_age.is_none()
            && self.max_age.is_none()
            && self.kids.is_none()
            && self.sort.is_none()
    }
}

/// Flatten validator errors into JSON field name to messages
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = json_field_name(&field.to_string());
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field, messages)
        })
        .collect()
}

fn json_field_name(rust_name: &str) -> String {
    match rust_name {
        STRUCT_ERRORS_KEY => AGE_RANGE_FIELD,
        "willing_to_relocate" => "willingToRelocate",
        "wants_kids" => "wantsKids",
        "age_range_min" => "ageRangeMin",
        "age_range_max" => "ageRangeMax",
        "marital_status" => "maritalStatus",
        "marriage_timeline" => "marriageTimeline",
        other => other,
    }
    .to_string()
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required"));
    }
    Ok(())
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    if !GENDERS.contains(&value) {
        return Err(error("gender", "Gender is required"));
    }
    Ok(())
}

fn validate_marital_status(value: &str) -> Result<(), ValidationError> {
    if !MARITAL_STATUSES.contains(&value) {
        return Err(error("marital_status", "Marital status is required"));
    }
    Ok(())
}

fn validate_marriage_timeline(value: &str) -> Result<(), ValidationError> {
    if !MARRIAGE_TIMELINES.contains(&value) {
        return Err(error("marriage_timeline", "Marriage timeline is required"));
    }
    Ok(())
}

fn validate_bio(value: &str) -> Result<(), ValidationError> {
    if visible_text_len(value) < MIN_BIO_CHARS {
        return Err(error(
            "bio_length",
            "Please provide at least 150 characters describing yourself",
        ));
    }
    Ok(())
}

fn validate_age_range(request: &CreateProfileRequest) -> Result<(), ValidationError> {
    if request.age_range_min > request.age_range_max {
        return Err(error(
            "age_range",
            "Minimum age must not be greater than maximum age",
        ));
    }
    Ok(())
}
