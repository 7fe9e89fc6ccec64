/// HTTP middleware utilities for the knowledge listing service
///
/// Provides bearer-token authentication in front of the listing endpoints.
/// Every request gets a `Principal` in its extensions: authenticated
/// requests carry the capabilities from their token claims, anonymous
/// requests carry the index capability only when the deployment allows
/// anonymous browsing.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::AuthConfig;

/// Capability required to browse the index views.
pub const CAP_INDEX_VIEW: &str = "index:view";

/// Token claims validated by [`AuthMiddleware`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string
    pub sub: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub caps: Vec<String>,
    pub exp: usize,
}

/// Requesting identity stored in request extensions after auth.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Option<i64>,
    pub identifier: Option<String>,
    pub capabilities: Vec<String>,
}

impl Principal {
    pub fn anonymous(allow_index: bool) -> Self {
        Principal {
            user_id: None,
            identifier: None,
            capabilities: if allow_index {
                vec![CAP_INDEX_VIEW.to_string()]
            } else {
                Vec::new()
            },
        }
    }

    pub fn can_view_index(&self) -> bool {
        self.capabilities.iter().any(|c| c == CAP_INDEX_VIEW)
    }
}

/// Actix middleware that validates a Bearer token and resolves the request
/// principal.
pub struct AuthMiddleware {
    jwt_secret: Option<String>,
    allow_anonymous: bool,
}

impl AuthMiddleware {
    pub fn new(auth: &AuthConfig) -> Self {
        Self {
            jwt_secret: auth.jwt_secret.clone(),
            allow_anonymous: auth.allow_anonymous,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_secret: self.jwt_secret.clone().map(Rc::new),
            allow_anonymous: self.allow_anonymous,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_secret: Option<Rc<String>>,
    allow_anonymous: bool,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_secret = self.jwt_secret.clone();
        let allow_anonymous = self.allow_anonymous;

        Box::pin(async move {
            let bearer = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer ").map(str::to_string));

            let principal = match (bearer, jwt_secret) {
                (Some(token), Some(secret)) => {
                    let data = decode::<Claims>(
                        &token,
                        &DecodingKey::from_secret(secret.as_bytes()),
                        &Validation::new(Algorithm::HS256),
                    )
                    .map_err(|_| ErrorUnauthorized("Invalid or expired token"))?;

                    let user_id = data
                        .claims
                        .sub
                        .parse::<i64>()
                        .map_err(|_| ErrorUnauthorized("Invalid user ID"))?;

                    Principal {
                        user_id: Some(user_id),
                        identifier: data.claims.identifier,
                        capabilities: data.claims.caps,
                    }
                }
                (Some(_), None) => {
                    tracing::warn!("bearer token received but no JWT secret is configured");
                    Principal::anonymous(allow_anonymous)
                }
                (None, _) => Principal::anonymous(allow_anonymous),
            };

            req.extensions_mut().insert(principal);

            service.call(req).await
        })
    }
}

impl FromRequest for Principal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Principal missing")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_capabilities_follow_deployment_flag() {
        assert!(Principal::anonymous(true).can_view_index());
        assert!(!Principal::anonymous(false).can_view_index());
    }
}
