use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::filters::{ProfileFilter, SortOrder};
use crate::models::requests::field_messages;
use crate::models::{
    CreateProfileRequest, ErrorResponse, FormStep, HealthResponse, ListingQuery, ProfilesResponse,
    StepValidationResponse,
};
use crate::services::{ProfileStore, StoreError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProfileStore>,
}

impl AppState {
    pub fn new(store: ProfileStore) -> Self {
        Self { store: Arc::new(store) }
    }
}

/// Configure all profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles", web::get().to(list_profiles))
        .route("/profiles", web::post().to(create_profile))
        .route("/profiles/validate/{step}", web::post().to(validate_step))
        .route("/profiles/{id}", web::get().to(get_profile));
}

fn error_response(status: u16, error: &str, message: String) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.store.health_check().await.unwrap_or(false);
    let profiles = if healthy {
        state.store.count_profiles().await.ok()
    } else {
        None
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        profiles,
    })
}

/// Create profile endpoint
///
/// POST /api/profiles
///
/// Request body:
/// ```json
/// {
///   "username": "string",
///   "age": 28,
///   "gender": "Male|Female",
///   "location": "London, UK",
///   "willingToRelocate": true,
///   "wantsKids": true,
///   "ageRangeMin": 24,
///   "ageRangeMax": 32,
///   "maritalStatus": "Single|Divorced|Widowed|Married",
///   "marriageTimeline": "ASAP|Within 6 months|Within 1 year|1-2 years",
///   "bio": "<p>at least 150 characters</p>"
/// }
/// ```
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_profile request: field_errors={:?}", field_messages(&errors));
        return HttpResponse::BadRequest().json(error_response(
            400,
            "Validation failed",
            errors.to_string(),
        ));
    }

    let new_profile = req.into_inner().into_new_profile();

    match state.store.create_profile(new_profile).await {
        Ok(profile) => {
            tracing::info!("Created profile {} for {}", profile.id, profile.username);
            HttpResponse::Ok().json(profile)
        }
        Err(e) => {
            tracing::error!("Error creating profile: {}", e);
            HttpResponse::InternalServerError().json(error_response(
                500,
                "Failed to create profile",
                e.to_string(),
            ))
        }
    }
}

/// List profiles endpoint
///
/// GET /api/profiles?location=&userAge=&maritalStatus=a,b&gender=&relocate=&marriageTimeline=&minAge=&maxAge=&kids=&sort=
///
/// Without parameters every profile is returned, newest first.
async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<ListingQuery>,
) -> impl Responder {
    let result = if query.is_blank() {
        state.store.list_profiles().await
    } else {
        let filter = ProfileFilter::from(&*query);
        let sort = SortOrder::parse(query.sort.as_deref());
        tracing::debug!("Listing profiles with {:?}, sort={}", filter, sort.as_str());
        state.store.filtered_profiles(&filter, sort).await
    };

    match result {
        Ok(profiles) => {
            let total = profiles.len();
            HttpResponse::Ok().json(ProfilesResponse { profiles, total })
        }
        Err(e) => {
            tracing::error!("Error fetching profiles: {}", e);
            HttpResponse::InternalServerError().json(error_response(
                500,
                "Failed to fetch profiles",
                e.to_string(),
            ))
        }
    }
}

/// Profile detail endpoint
///
/// GET /api/profiles/{id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match state.store.get_profile(id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(StoreError::NotFound(_)) => HttpResponse::NotFound().json(error_response(
            404,
            "Profile not found",
            format!("No profile with id {}", id),
        )),
        Err(e) => {
            tracing::error!("Error fetching profile {}: {}", id, e);
            HttpResponse::InternalServerError().json(error_response(
                500,
                "Failed to fetch profile",
                e.to_string(),
            ))
        }
    }
}

/// Validate one step of the submission form
///
/// POST /api/profiles/validate/{step}
///
/// The body is the form state so far; fields of later steps may be missing.
async fn validate_step(
    path: web::Path<u8>,
    req: web::Json<CreateProfileRequest>,
) -> impl Responder {
    let number = path.into_inner();
    let Some(step) = FormStep::from_number(number) else {
        return HttpResponse::BadRequest().json(error_response(
            400,
            "Invalid step",
            format!("Step must be between 1 and {}, got {}", FormStep::ALL.len(), number),
        ));
    };

    let errors = req.validate_step(step);

    HttpResponse::Ok().json(StepValidationResponse {
        step: step.number(),
        name: step.name().to_string(),
        valid: errors.is_empty(),
        errors,
    })
}
