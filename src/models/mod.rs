// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{NewProfile, Profile, GENDERS, MARITAL_STATUSES, MARRIAGE_TIMELINES};
pub use requests::{CreateProfileRequest, FormStep, ListingQuery};
pub use responses::{ErrorResponse, HealthResponse, ProfilesResponse, StepValidationResponse};
