use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Genders offered by the submission form
pub const GENDERS: &[&str] = &["Male", "Female"];

/// Marital statuses offered by the submission form and the listing filter
pub const MARITAL_STATUSES: &[&str] = &["Single", "Divorced", "Widowed", "Married"];

/// Marriage timelines offered by the submission form
pub const MARRIAGE_TIMELINES: &[&str] = &["ASAP", "Within 6 months", "Within 1 year", "1-2 years"];

/// A matrimonial listing as stored in the `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    #[serde(alias = "redditUsername")]
    pub username: String,
    pub age: i32,
    pub gender: String,
    pub location: String,
    #[serde(rename = "willingToRelocate")]
    pub willing_to_relocate: bool,
    #[serde(rename = "wantsKids", default)]
    pub wants_kids: bool,
    #[serde(rename = "ageRangeMin")]
    pub age_range_min: i32,
    #[serde(rename = "ageRangeMax")]
    pub age_range_max: i32,
    #[serde(rename = "maritalStatus")]
    pub marital_status: String,
    #[serde(rename = "marriageTimeline")]
    pub marriage_timeline: String,
    pub bio: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Whether a visitor of `age` falls inside this profile's preferred range
    pub fn accepts_age(&self, age: i32) -> bool {
        self.age_range_min <= age && self.age_range_max >= age
    }
}

/// Sanitized insert payload; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub username: String,
    pub age: i32,
    pub gender: String,
    pub location: String,
    pub willing_to_relocate: bool,
    pub wants_kids: bool,
    pub age_range_min: i32,
    pub age_range_max: i32,
    pub marital_status: String,
    pub marriage_timeline: String,
    pub bio: String,
}

impl NewProfile {
    pub fn into_profile(self, id: i64, created_at: DateTime<Utc>) -> Profile {
        Profile {
            id,
            username: self.username,
            age: self.age,
            gender: self.gender,
            location: self.location,
            willing_to_relocate: self.willing_to_relocate,
            wants_kids: self.wants_kids,
            age_range_min: self.age_range_min,
            age_range_max: self.age_range_max,
            marital_status: self.marital_status,
            marriage_timeline: self.marriage_timeline,
            bio: self.bio,
            created_at,
        }
    }
}
