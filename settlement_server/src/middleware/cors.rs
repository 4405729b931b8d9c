//! CORS middleware for Actix Web.
//!
//! The checkout page calls the server directly from the browser, so every response carries the
//! `Access-Control-Allow-Origin` and `Access-Control-Allow-Headers` headers.
//!
//! Preflight (`OPTIONS`) requests are answered by the middleware itself with an empty `200 OK`. They never reach a
//! route handler, so no authentication or body parsing happens for them.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        Method,
    },
    Error,
    HttpResponse,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};

pub const CORS_ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

pub struct CorsMiddlewareFactory {
    allowed_origin: HeaderValue,
}

impl CorsMiddlewareFactory {
    pub fn new(allowed_origin: &str) -> Self {
        let allowed_origin = HeaderValue::from_str(allowed_origin).unwrap_or_else(|e| {
            warn!("🔐️ '{allowed_origin}' is not a valid Access-Control-Allow-Origin value. {e}. Falling back to '*'.");
            HeaderValue::from_static("*")
        });
        CorsMiddlewareFactory { allowed_origin }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = CorsMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddlewareService { allowed_origin: self.allowed_origin.clone(), service: Rc::new(service) }))
    }
}

pub struct CorsMiddlewareService<S> {
    allowed_origin: HeaderValue,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CorsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<EitherBody<B>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let origin = self.allowed_origin.clone();
        Box::pin(async move {
            let mut res = if req.method() == Method::OPTIONS {
                trace!("🔐️ Answering CORS preflight for {}", req.path());
                req.into_response(HttpResponse::Ok().finish()).map_into_right_body()
            } else {
                service.call(req).await?.map_into_left_body()
            };
            let headers = res.headers_mut();
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(CORS_ALLOWED_HEADERS));
            Ok(res)
        })
    }
}
