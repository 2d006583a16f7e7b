use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::{AppError, AuthFailure};

/// The verified identity of the caller.
///
/// Built from the [`Claims`] that `AuthMiddleware` places in the request extensions.
/// The claims are trusted for the rest of the request; the store is not consulted again.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub firstname: String,
    pub lastname: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            firstname: claims.firstname,
            lastname: claims.lastname,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser::from(claims))),
            // Route is missing the AuthMiddleware wrap.
            None => ready(Err(AppError::Unauthorized(AuthFailure::TokenMissing).into())),
        }
    }
}
