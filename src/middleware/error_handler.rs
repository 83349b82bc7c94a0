use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, StatusCode},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::utils::error::{error_response, public_message, AppError};

/// Catch-all that turns every failed request into `{"message": ...}` JSON.
///
/// `AppError` already renders itself as JSON. This layer covers what never
/// reaches a handler (unknown routes, extractor failures) and errors returned
/// by inner services.
pub struct ErrorResponder;

impl<S, B> Transform<S, ServiceRequest> for ErrorResponder
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorResponderMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorResponderMiddleware { service }))
    }
}

pub struct ErrorResponderMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorResponderMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The request must not be cloned here: the router needs sole ownership to write match info
        let path = req.path().to_owned();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = match fut.await {
                Ok(res) => res,
                Err(err) => {
                    let status = error_status(err.as_response_error().status_code());
                    log::error!("❌ Unhandled error on {}: {}", path, err);
                    // Rendered through `AppError`'s `ResponseError` impl
                    return Err(AppError::Http(status, err.to_string()).into());
                }
            };

            if !needs_json_body(&res) {
                return Ok(res.map_into_left_body());
            }

            let status = res.status();
            let message = match res.response().error() {
                Some(err) => err.to_string(),
                None => status
                    .canonical_reason()
                    .unwrap_or("Unexpected error")
                    .to_string(),
            };

            if status.is_server_error() {
                log::error!("❌ {} {}: {}", status.as_u16(), path, message);
            }

            let (req, _) = res.into_parts();
            let response = error_response(status, public_message(status, message));
            Ok(ServiceResponse::new(req, response).map_into_right_body())
        })
    }
}

/// An error without a failure status still has to be reported as one
fn error_status(status: StatusCode) -> StatusCode {
    if status.is_client_error() || status.is_server_error() {
        status
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn needs_json_body<B>(res: &ServiceResponse<B>) -> bool {
    let status = res.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return false;
    }

    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    !is_json
}
