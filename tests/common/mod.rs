#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use taskledger::config::Config;
use taskledger::routes;
use taskledger::state::AppState;

pub const SECRET: &str = "integration_test_secret";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: SECRET.to_string(),
        allowed_email_tlds: vec!["com".to_string(), "net".to_string()],
        cookie_secure: true,
    }
}

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::in_memory(test_config()))
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(App::new().app_data(state).configure(routes::config)).await
}

/// Sends a request and returns the status with the decoded JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: Request,
) -> (u16, Value) {
    // Service errors (e.g. rejections from middleware) are rendered into responses
    // the same way the actix server does, instead of panicking in `call_service`.
    let (status, body) = match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status().as_u16();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status().as_u16();
            (status, actix_web::body::to_bytes(resp.into_body()).await.unwrap_or_default())
        }
    };
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn signup_payload(firstname: &str, email: &str, password: &str) -> Value {
    json!({
        "firstname": firstname,
        "lastname": "Lee",
        "email": email,
        "password": password
    })
}

pub fn task_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Prepare the slides",
        "dueDate": "2026-11-01T09:00:00Z",
        "status": "todo",
        "priority": "high"
    })
}

pub struct TestUser {
    pub id: String,
    pub token: String,
}

/// Signs a user up and logs them in, returning their id and session token.
pub async fn register_and_login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    firstname: &str,
    email: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/userSignup")
        .set_json(signup_payload(firstname, email, "Abc123!"))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "signup failed: {}", body);

    let req = test::TestRequest::post()
        .uri("/userLogin")
        .set_json(json!({ "email": email, "password": "Abc123!" }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, 200, "login failed: {}", body);

    TestUser {
        id: body["user"]["user_id"].as_str().unwrap().to_string(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}
