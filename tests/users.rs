mod common;

use actix_web::cookie::time::Duration;
use actix_web::test;
use common::{init_app, send, signup_payload, test_state, SECRET};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskledger::auth::verify_token;

#[test_log::test(actix_web::test)]
async fn test_signup_then_duplicate_email_conflicts() {
    let app = init_app(test_state()).await;

    let req = test::TestRequest::post()
        .uri("/userSignup")
        .set_json(json!({
            "firstname": "Ann",
            "lastname": "Lee",
            "email": "ann@x.com",
            "password": "Abc123!"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 201, "Body: {}", body);
    assert_eq!(body["message"], "User added successfully");
    assert!(body["user_id"].is_string());

    // Same email, every other field different.
    let req = test::TestRequest::post()
        .uri("/userSignup")
        .set_json(json!({
            "firstname": "Bob",
            "lastname": "Ray",
            "email": "ann@x.com",
            "password": "Zyx987#"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "User already exists");
}

#[actix_web::test]
async fn test_invalid_signup_inputs() {
    let app = init_app(test_state()).await;

    let test_cases = vec![
        (
            json!({ "lastname": "Lee", "email": "ann@x.com", "password": "Abc123!" }),
            400,
            "missing firstname",
        ),
        (
            signup_payload("An", "ann@x.com", "Abc123!"),
            400,
            "firstname too short",
        ),
        (
            signup_payload("Ann Marie", "ann@x.com", "Abc123!"),
            400,
            "firstname not alphanumeric",
        ),
        (
            signup_payload("Ann", "ann-at-x.com", "Abc123!"),
            400,
            "invalid email format",
        ),
        (
            signup_payload("Ann", "ann@x.org", "Abc123!"),
            400,
            "email tld not allowed",
        ),
        (
            signup_payload("Ann", "ann@x.com", "abc123!"),
            400,
            "password without uppercase",
        ),
        (
            signup_payload("Ann", "ann@x.com", "Ab1!"),
            400,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/userSignup")
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(
            status, expected_status,
            "Test case failed: {}. Body: {}",
            description, body
        );
        assert!(!body["error"].is_null(), "{}: no error body", description);
    }
}

#[actix_web::test]
async fn test_validation_errors_are_structured() {
    let app = init_app(test_state()).await;

    let req = test::TestRequest::post()
        .uri("/userSignup")
        .set_json(signup_payload("An", "ann@x.org", "weak"))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, 400);
    let details = &body["error"]["details"];
    assert!(details["firstname"].is_array());
    assert!(details["email"].is_array());
    assert!(details["password"].is_array());
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let app = init_app(test_state()).await;
    common::register_and_login(&app, "Ann", "ann@x.com").await;

    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": "ann@x.com", "password": "Wrong123!" }))
        .to_request();
    let wrong_password = send(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": "nobody@x.com", "password": "Abc123!" }))
        .to_request();
    let unknown_email = send(&app, req).await;

    assert_eq!(wrong_password.0, 401);
    assert_eq!(wrong_password, unknown_email);
}

#[actix_web::test]
async fn test_login_returns_token_and_cookie() {
    let app = init_app(test_state()).await;

    let req = test::TestRequest::post()
        .uri("/userSignup")
        .set_json(signup_payload("Ann", "ann@x.com", "Abc123!"))
        .to_request();
    let (_, signup) = send(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": "ann@x.com", "password": "Abc123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "token")
        .expect("token cookie")
        .into_owned();
    let body: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["user_id"], signup["user_id"]);
    assert_eq!(body["user"]["firstname"], "Ann");
    assert_eq!(body["user"]["lastname"], "Lee");
    assert!(body["user"].get("email").is_none());

    let token = body["token"].as_str().unwrap();
    assert_eq!(cookie.value(), token);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));

    let claims = verify_token(token, SECRET).unwrap();
    assert_eq!(claims.firstname, "Ann");
    assert_eq!(claims.user_id.to_string(), signup["user_id"].as_str().unwrap());
}

#[actix_web::test]
async fn test_update_user_rehashes_password() {
    let app = init_app(test_state()).await;
    let user = common::register_and_login(&app, "Ann", "ann@x.com").await;

    // The update rules are looser than signup: any non-empty password is accepted.
    let req = test::TestRequest::put()
        .uri(&format!("/updateUser/{}", user.id))
        .set_json(json!({
            "firstname": "Annie",
            "lastname": "Lee",
            "email": "annie@x.org",
            "password": "plain"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200, "Body: {}", body);
    assert_eq!(body["firstname"], "Annie");
    assert_eq!(body["email"], "annie@x.org");
    assert!(body.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": "annie@x.org", "password": "plain" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 200);

    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": "ann@x.com", "password": "Abc123!" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_web::test]
async fn test_update_user_edge_cases() {
    let app = init_app(test_state()).await;
    let ann = common::register_and_login(&app, "Ann", "ann@x.com").await;
    common::register_and_login(&app, "Bob", "bob@x.com").await;

    let update = |email: &str| {
        json!({ "firstname": "Ann", "lastname": "Lee", "email": email, "password": "Abc123!" })
    };

    let req = test::TestRequest::put()
        .uri(&format!("/updateUser/{}", ann.id))
        .set_json(update("bob@x.com"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 409, "email of another active user");

    let req = test::TestRequest::put()
        .uri("/updateUser/3f0c9a62-27b1-4d6e-9a51-8d2f5b0c1e77")
        .set_json(update("ghost@x.com"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 404, "unknown id");

    let req = test::TestRequest::put()
        .uri(&format!("/updateUser/{}", ann.id))
        .set_json(json!({ "firstname": "Ann", "lastname": "Lee", "email": "ann@x.com" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400, "missing password");

    let req = test::TestRequest::put()
        .uri("/updateUser/not-a-uuid")
        .set_json(update("ann@x.com"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 404, "malformed id");
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_delete_user_twice() {
    let app = init_app(test_state()).await;
    let user = common::register_and_login(&app, "Ann", "ann@x.com").await;

    let req = test::TestRequest::put()
        .uri(&format!("/deleteUser/{}", user.id))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "User deleted successfully");

    let req = test::TestRequest::put()
        .uri(&format!("/deleteUser/{}", user.id))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "User not found or already been deleted");

    // A deleted account can no longer log in, and its email is free again.
    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": "ann@x.com", "password": "Abc123!" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 401);

    let req = test::TestRequest::post()
        .uri("/userSignup")
        .set_json(signup_payload("Ann", "ann@x.com", "Abc123!"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 201);
}
