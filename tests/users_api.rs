use actix_web::{test, web, App};
use crafter_server::{configure, AppState, MemoryUserStore, Settings};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    web::Data::new(AppState::with_store(config, Arc::new(MemoryUserStore::new())))
}

fn signup_body(email: &str) -> Value {
    json!({
        "first_name": "Test",
        "last_name": "User",
        "date_of_birth": "1999-01-31",
        "email": email,
        "password": "secret1",
        "user_type": "Student",
        "experience_level": "Entry-level",
        "college": "State University"
    })
}

#[actix_web::test]
async fn test_list_users_pagination() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure)
    ).await;

    for i in 1..=12 {
        let response = test::TestRequest::post()
            .uri("/users/signup")
            .set_json(signup_body(&format!("user{}@example.com", i)))
            .send_request(&app)
            .await;
        assert_eq!(response.status(), 200);
    }

    let response = test::TestRequest::get()
        .uri("/users?page=2&recordPerPage=5")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = test::read_body_json(response).await;

    assert_eq!(body["total_count"], 12);
    assert_eq!(body["page"], 2);
    assert_eq!(body["recordPerPage"], 5);
    let emails: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(
        emails,
        vec![
            "user6@example.com",
            "user7@example.com",
            "user8@example.com",
            "user9@example.com",
            "user10@example.com",
        ]
    );
    for user in body["users"].as_array().unwrap() {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("token").is_none());
    }

    // Invalid parameters fall back to page 1 with 10 records.
    let response = test::TestRequest::get()
        .uri("/users?page=abc&recordPerPage=0")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["recordPerPage"], 10);
    assert_eq!(body["users"].as_array().unwrap().len(), 10);
    assert_eq!(body["users"][0]["email"], "user1@example.com");
}

#[actix_web::test]
async fn test_get_user_by_id() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure)
    ).await;

    let response = test::TestRequest::post()
        .uri("/users/signup")
        .set_json(signup_body("lookup@example.com"))
        .send_request(&app)
        .await;
    let signup: Value = test::read_body_json(response).await;
    let user_id = signup["user"]["id"].as_str().unwrap().to_string();

    let response = test::TestRequest::get()
        .uri(&format!("/users/{}", user_id))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let user: Value = test::read_body_json(response).await;
    assert_eq!(user["id"], user_id.as_str());
    assert_eq!(user["email"], "lookup@example.com");
    assert_eq!(user["college"], "State University");
    assert!(user.get("password_hash").is_none());

    let response = test::TestRequest::get()
        .uri(&format!("/users/{}", Uuid::new_v4()))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 404);

    let response = test::TestRequest::get()
        .uri("/users/not-an-id")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn test_update_user() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure)
    ).await;

    let response = test::TestRequest::post()
        .uri("/users/signup")
        .set_json(signup_body("before@example.com"))
        .send_request(&app)
        .await;
    let signup: Value = test::read_body_json(response).await;
    let user_id = signup["user"]["id"].as_str().unwrap().to_string();

    let response = test::TestRequest::put()
        .uri(&format!("/users/{}", user_id))
        .set_json(json!({
            "email": "After@Example.com",
            "user_type": "Professional",
            "current_company": "Initech"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "user updated successfully");

    let response = test::TestRequest::get()
        .uri(&format!("/users/{}", user_id))
        .send_request(&app)
        .await;
    let user: Value = test::read_body_json(response).await;
    assert_eq!(user["id"], user_id.as_str());
    assert_eq!(user["email"], "after@example.com");
    assert_eq!(user["user_type"], "Professional");
    assert_eq!(user["current_company"], "Initech");
    assert_eq!(user["first_name"], "Test");
    assert_eq!(user["created_at"], signup["user"]["created_at"]);

    // Login follows the new address.
    let response = test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": "after@example.com", "password": "secret1" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
}

#[actix_web::test]
async fn test_update_user_failures() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure)
    ).await;

    let mut ids = Vec::new();
    for email in ["one@example.com", "two@example.com"] {
        let response = test::TestRequest::post()
            .uri("/users/signup")
            .set_json(signup_body(email))
            .send_request(&app)
            .await;
        let signup: Value = test::read_body_json(response).await;
        ids.push(signup["user"]["id"].as_str().unwrap().to_string());
    }

    let response = test::TestRequest::put()
        .uri(&format!("/users/{}", ids[1]))
        .set_json(json!({ "email": "one@example.com" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"]["message"], "this email already exists");

    let response = test::TestRequest::put()
        .uri(&format!("/users/{}", Uuid::new_v4()))
        .set_json(json!({ "first_name": "Nobody" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 404);

    let response = test::TestRequest::put()
        .uri("/users/12345")
        .set_json(json!({ "first_name": "Nobody" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);

    let response = test::TestRequest::put()
        .uri(&format!("/users/{}", ids[0]))
        .set_json(json!({ "experience_level": "Principal" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);

    let response = test::TestRequest::put()
        .uri(&format!("/users/{}", ids[0]))
        .set_json(json!({}))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);
}
