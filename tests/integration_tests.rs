// Integration tests for ISO Profiles
//
// Drives the HTTP surface end to end over the in-memory store.

use actix_web::{test, web, App};
use iso_profiles::routes::{self, AppState};
use iso_profiles::services::{MemoryStore, ProfileStore};
use serde_json::{json, Value};

fn bio() -> String {
    format!(
        "<p>{}</p>",
        "Practicing and family oriented, enjoys hiking, reading and cooking. ".repeat(3)
    )
}

fn profile_body(username: &str, age: i64, gender: &str, location: &str) -> Value {
    json!({
        "username": username,
        "age": age,
        "gender": gender,
        "location": location,
        "willingToRelocate": age % 2 == 0,
        "wantsKids": true,
        "ageRangeMin": age - 2,
        "ageRangeMax": age + 5,
        "maritalStatus": "Single",
        "marriageTimeline": "ASAP",
        "bio": bio(),
    })
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(ProfileStore::Memory(MemoryStore::new()))))
                .configure(routes::configure_extractors)
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_create_then_list() {
    let app = init_app!();

    for (name, age, gender, location) in [
        ("first", 26, "Female", "London, UK"),
        ("second", 31, "Male", "Toronto, Canada"),
        ("third", 29, "Female", "Birmingham, UK"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/profiles")
            .set_json(profile_body(name, age, gender, location))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["username"], name);
        assert!(created["id"].as_i64().is_some());
    }

    let req = test::TestRequest::get().uri("/api/profiles").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);
    let names: Vec<&str> = body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[actix_web::test]
async fn test_filter_and_sort_from_query_string() {
    let app = init_app!();

    for (name, age, gender, location) in [
        ("a", 26, "Female", "London, UK"),
        ("b", 33, "Female", "Manchester, UK"),
        ("c", 28, "Male", "London, UK"),
        ("d", 30, "Female", "Dubai, UAE"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/profiles")
            .set_json(profile_body(name, age, gender, location))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri("/api/profiles?gender=Female&location=uk&sort=age-desc")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["b", "a"]);

    // b prefers 31..=38, so a visitor aged 30 is outside its range
    let req = test::TestRequest::get()
        .uri("/api/profiles?userAge=30&maritalStatus=Single,Widowed&sort=age-asc")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a", "c", "d"]);

    let req = test::TestRequest::get()
        .uri("/api/profiles?relocate=false")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["profiles"][0]["username"], "b");
}

#[actix_web::test]
async fn test_create_sanitizes_bio() {
    let app = init_app!();

    let mut body = profile_body("safe", 27, "Male", "Chicago, USA");
    body["bio"] = json!(format!("{}<script>alert('x')</script>", bio()));

    let req = test::TestRequest::post()
        .uri("/api/profiles")
        .set_json(body)
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["bio"], bio());
}

#[actix_web::test]
async fn test_create_rejects_invalid_profile() {
    let app = init_app!();

    let mut body = profile_body("young", 16, "Male", "Chicago, USA");
    body["bio"] = json!("too short");

    let req = test::TestRequest::post()
        .uri("/api/profiles")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"], "Validation failed");
    assert_eq!(error["status_code"], 400);
}

#[actix_web::test]
async fn test_malformed_json_is_a_json_error() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/profiles")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"], "invalid_json");
}

#[actix_web::test]
async fn test_get_profile_by_id() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/profiles")
        .set_json(profile_body("detail", 30, "Female", "Sydney, Australia"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/profiles/{}", id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::get().uri("/api/profiles/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let req = test::TestRequest::get().uri("/api/profiles/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_validate_form_steps() {
    let app = init_app!();

    let partial = json!({
        "username": "stepper",
        "age": 30,
        "gender": "Male",
        "location": "Houston, USA",
        "maritalStatus": "Widowed",
    });

    let req = test::TestRequest::post()
        .uri("/api/profiles/validate/1")
        .set_json(&partial)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["name"], "Basic Information");

    let req = test::TestRequest::post()
        .uri("/api/profiles/validate/2")
        .set_json(&partial)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], false);
    assert!(body["errors"].get("ageRangeMin").is_some());
    assert!(body["errors"].get("marriageTimeline").is_some());
    assert!(body["errors"].get("bio").is_none());

    let req = test::TestRequest::post()
        .uri("/api/profiles/validate/7")
        .set_json(&partial)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_health_reports_profile_count() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/profiles")
        .set_json(profile_body("counted", 30, "Male", "Montreal, Canada"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["profiles"], 1);
}
