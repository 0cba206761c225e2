use actix_cors::Cors;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, ready, Ready};
use std::rc::Rc;

use crate::config::Config;

pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://fonts.googleapis.com; \
style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://fonts.googleapis.com; \
font-src 'self' https://cdn.jsdelivr.net https://fonts.gstatic.com";

pub const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000; includeSubDomains";

/// Permissive CORS: every origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Redirects plaintext requests to HTTPS when enabled and stamps the
/// security headers on every response.
#[derive(Clone, Default)]
pub struct SecurityHeaders {
    pub enforce_https: bool,
}

impl SecurityHeaders {
    pub fn from_config(cfg: &Config) -> Self {
        Self { enforce_https: cfg.mode.is_production() }
    }

    pub fn with_https_redirect(mut self, enable: bool) -> Self {
        self.enforce_https = enable;
        self
    }
}

fn apply_headers(headers: &mut HeaderMap) {
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    headers.insert(header::STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(STRICT_TRANSPORT_SECURITY));
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(CONTENT_SECURITY_POLICY));
}

/// `Some(https url)` when the request arrived over plain HTTP and no proxy
/// reported otherwise.
fn https_redirect_target(req: &ServiceRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let info = req.connection_info();
    if info.scheme() == "https" || forwarded != "http" {
        return None;
    }
    let path = req.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    Some(format!("https://{}{}", info.host(), path))
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service: Rc::new(service),
            cfg: self.clone(),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: Rc<S>,
    cfg: SecurityHeaders,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.cfg.enforce_https {
            if let Some(location) = https_redirect_target(&req) {
                tracing::debug!(%location, "redirecting plaintext request");
                let resp = HttpResponse::MovedPermanently()
                    .insert_header((header::LOCATION, location))
                    .finish();
                let mut res = req.into_response(resp).map_into_right_body();
                apply_headers(res.headers_mut());
                return Box::pin(async move { Ok(res) });
            }
        }
        let svc = self.service.clone();
        Box::pin(async move {
            let mut res = svc.call(req).await?;
            apply_headers(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}
