//! Bounded request handling time.

use crate::error::AppError;
use actix_web::body::EitherBody;
use actix_web::dev::{self, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::time::Duration;

/// Answers 504 with the usual JSON error body when a handler runs past the deadline.
#[derive(Clone)]
pub struct RequestTimeout {
    limit: Duration,
}

impl RequestTimeout {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutMiddleware {
            service: Rc::new(service),
            limit: self.limit,
        }))
    }
}

pub struct RequestTimeoutMiddleware<S> {
    service: Rc<S>,
    limit: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let http_req = req.request().clone();
        let limit = self.limit;
        let fut = self.service.call(req);

        Box::pin(async move {
            match actix_web::rt::time::timeout(limit, fut).await {
                Ok(res) => res.map(|res| res.map_into_left_body()),
                Err(_) => {
                    log::warn!("Request to {} exceeded {:?}", http_req.path(), limit);
                    let resp = AppError::Timeout.error_response();
                    Ok(ServiceResponse::new(http_req, resp).map_into_right_body())
                }
            }
        })
    }
}
