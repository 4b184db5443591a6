//! Access gate.
//!
//! `BearerAuth` reads the `Authorization: Bearer <token>` header once per request and
//! stores the outcome in the request extensions. Handlers then opt into the checks
//! they need through extractors:
//!
//! - `Identity`: authentication. No header is `Unauthenticated` (401); a header that
//!   does not carry a valid, unexpired token is `Forbidden` (403).
//! - `Identity::require_email`: the authenticated email must match a path or body email.
//! - `AdminIdentity`: authentication followed by a role lookup in the store.
//!
//! The role is read from the store on every admin-gated call and never cached, so a
//! demotion takes effect on the very next request.

use crate::error::AppError;
use crate::token::{Claims, TokenService};
use actix_web::dev::{self, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web::Data, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use sea_orm::DatabaseConnection;

/// Authenticated caller, attached to the request by `BearerAuth`.
#[derive(Clone, Debug)]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Identity match for self-scoped routes.
    pub fn require_email(&self, email: &str) -> Result<(), AppError> {
        if self.claims.email == email {
            Ok(())
        } else {
            log::warn!(
                "Identity mismatch: token for {} used on resource of {}",
                self.claims.email,
                email
            );
            Err(AppError::forbidden())
        }
    }

    fn from_request_parts(req: &HttpRequest) -> Result<Self, AppError> {
        let credential = req
            .extensions()
            .get::<Credential>()
            .cloned()
            .unwrap_or_else(|| Credential::from_request(req));

        match credential {
            Credential::Verified(identity) => Ok(identity),
            Credential::Missing => Err(AppError::Unauthenticated),
            Credential::Rejected => Err(AppError::forbidden()),
        }
    }
}

/// What the Authorization header yielded.
#[derive(Clone, Debug)]
enum Credential {
    Missing,
    Rejected,
    Verified(Identity),
}

impl Credential {
    fn from_request(req: &HttpRequest) -> Self {
        let header = match req.headers().get(AUTHORIZATION) {
            Some(header) => header,
            None => return Credential::Missing,
        };

        let token = match header.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
            Some(token) => token.trim(),
            None => {
                log::warn!("Authorization header is not a bearer token");
                return Credential::Rejected;
            }
        };

        let tokens = match req.app_data::<Data<TokenService>>() {
            Some(tokens) => tokens,
            None => {
                log::error!("Token service is not registered; rejecting credential");
                return Credential::Rejected;
            }
        };

        match tokens.verify(token) {
            Ok(claims) => Credential::Verified(Identity::new(claims)),
            Err(e) => {
                log::warn!("Rejected bearer token: {}", e);
                Credential::Rejected
            }
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Identity::from_request_parts(req))
    }
}

/// Caller whose stored role is `admin` at the time of the request.
#[derive(Clone, Debug)]
pub struct AdminIdentity(pub Identity);

impl AdminIdentity {
    pub fn email(&self) -> &str {
        self.0.email()
    }
}

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = Identity::from_request_parts(req);
        let db = req.app_data::<Data<DatabaseConnection>>().cloned();

        Box::pin(async move {
            let identity = identity?;
            let db = db.ok_or_else(|| AppError::Internal("store handle is not registered".into()))?;

            if crate::user::is_admin(db.get_ref(), identity.email()).await? {
                Ok(AdminIdentity(identity))
            } else {
                log::warn!("Admin route refused for {}", identity.email());
                Err(AppError::forbidden())
            }
        })
    }
}

/// Middleware that verifies the bearer token and attaches the outcome to the request.
#[derive(Clone, Default)]
pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware { service }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let credential = Credential::from_request(req.request());
        req.extensions_mut().insert(credential);
        self.service.call(req)
    }
}
