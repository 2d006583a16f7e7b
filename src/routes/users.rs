use crate::{
    auth::{
        generate_token, hash_password, token::TOKEN_TTL_SECONDS, verify_password,
        verify_unknown_account, LoginRequest, LoginResponse, SignupRequest, UpdateUserRequest,
    },
    error::{AppError, AuthFailure},
    models::{User, UserChanges, UserProfile, UserSummary},
    state::AppState,
};
use actix_web::{
    cookie::{time::Duration, Cookie},
    post, put, web, HttpResponse, Responder,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Register a new user
///
/// Validates the payload, rejects an email already held by an active user with 409,
/// and stores the new account with a bcrypt hash of the password.
///
/// ## Responses:
/// - `201 Created`: `{"message": ..., "user_id": ...}`.
/// - `400 Bad Request`: Validation failed; field errors are under `error.details`.
/// - `409 Conflict`: The email is already registered.
#[post("/userSignup")]
pub async fn user_signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate_for_signup(&state.config.allowed_email_tlds)?;

    if state
        .users
        .find_active_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let SignupRequest {
        firstname,
        lastname,
        email,
        ..
    } = payload.into_inner();
    let user = User::new(firstname, lastname, email, password_hash);
    state.users.create_user(&user).await?;

    log::info!("user {} registered", user.id);
    Ok(HttpResponse::Created().json(json!({
        "message": "User added successfully",
        "user_id": user.id
    })))
}

/// Login user
///
/// Checks the credentials of an active user and issues a one-hour session token,
/// returned in the body and as an http-only `token` cookie.
///
/// An unknown email and a wrong password produce the same 401 response, and both
/// pay for a bcrypt verification.
#[post("/userLogin")]
pub async fn user_login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .find_active_user_by_email(&payload.email)
        .await?;

    let user = match user {
        Some(user) => user,
        None => {
            verify_unknown_account(&payload.password);
            return Err(rejected_login());
        }
    };
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(rejected_login());
    }

    let token = generate_token(&user, &state.config.jwt_secret)?;
    let cookie = Cookie::build("token", token.clone())
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .max_age(Duration::seconds(TOKEN_TTL_SECONDS))
        .finish();

    log::info!("user {} logged in", user.id);
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        message: "Login successful".into(),
        user: UserSummary::from(&user),
        token,
    }))
}

fn rejected_login() -> AppError {
    log::warn!("rejected login attempt");
    AppError::Unauthorized(AuthFailure::InvalidCredentials)
}

/// Update user
///
/// Replaces all profile fields of an active user. The supplied password is always
/// re-hashed, even when it matches the current one.
///
/// ## Responses:
/// - `200 OK`: The updated profile (without the password hash).
/// - `400 Bad Request`: Validation failed.
/// - `404 Not Found`: No active user with that id.
/// - `409 Conflict`: The email belongs to another active user.
#[put("/updateUser/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let UpdateUserRequest {
        firstname,
        lastname,
        email,
        password,
    } = payload.into_inner();
    let changes = UserChanges {
        firstname,
        lastname,
        email,
        password_hash: hash_password(&password)?,
    };

    match state.users.update_user(user_id.into_inner(), changes).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserProfile::from(user))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

/// Delete user
///
/// Soft-deletes the account. A second call for the same id answers 404.
#[put("/deleteUser/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();

    if state.users.soft_delete_user(user_id).await? {
        log::info!("user {} deleted", user_id);
        Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
    } else {
        Err(AppError::NotFound(
            "User not found or already been deleted".into(),
        ))
    }
}
