use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{AuthenticatedUser, AUTH_SCHEME};
use crate::error::AppError;
use crate::services::AuthService;

/// Authentication gate for everything under `/user`, `/project`, `/task` and `/restore`.
///
/// Rejections are rendered as responses here rather than returned as errors, so the
/// rest of the chain never sees an unauthenticated request.
#[derive(Clone)]
pub struct AuthMiddleware {
    auth: Arc<dyn AuthService>,
}

impl AuthMiddleware {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            auth: self.auth.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    auth: Arc<dyn AuthService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(self.auth.as_ref(), req.headers().get(AUTHORIZATION)) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), err);
                let response = req
                    .into_response(err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

/// Runs the header checks in order and resolves the caller's identity.
fn authenticate(
    auth: &dyn AuthService,
    header: Option<&HeaderValue>,
) -> Result<AuthenticatedUser, AppError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AppError::InvalidAuthHeader("empty auth header".into())),
    };

    let value = header
        .to_str()
        .map_err(|_| AppError::InvalidAuthHeader("invalid auth header".into()))?;

    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 || parts[0] != AUTH_SCHEME {
        return Err(AppError::InvalidAuthHeader("invalid auth header".into()));
    }

    let token = parts[1];
    if token.is_empty() {
        return Err(AppError::InvalidAuthHeader("token is empty".into()));
    }

    let (id, role) = auth
        .parse_token(token)
        .map_err(|err| AppError::Unauthorized(err.message().to_string()))?;

    Ok(AuthenticatedUser { id, role })
}
