use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{verify_token, Claims};
use crate::error::{AppError, AuthFailure};
use crate::state::AppState;

/// Request gate for protected routes.
///
/// Reads the session token from the `Authorization` header, verifies it with the
/// configured secret and stores the decoded [`Claims`] in the request extensions.
/// Requests without a valid token are answered with 401 before reaching the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verified = match req.app_data::<web::Data<AppState>>() {
            Some(state) => authenticate(req.headers(), &state.config.jwt_secret),
            None => Err(AppError::InternalServerError(
                "AppState is not registered as app data".into(),
            )),
        };

        match verified {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

/// Turns the request headers into verified claims, or the reason they were refused.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Claims, AppError> {
    let token = extract_token(headers)?;
    verify_token(token, secret)
}

/// Pulls the token out of the `Authorization` header.
///
/// The header value is the token itself. A `Bearer ` scheme prefix is also accepted.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Unauthorized(AuthFailure::TokenInvalid))?
            .trim(),
        None => return Err(AppError::Unauthorized(AuthFailure::TokenMissing)),
    };

    let token = match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => value[7..].trim_start(),
        _ => value,
    };

    if token.is_empty() || token.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(AuthFailure::TokenMissing));
    }
    Ok(token)
}
