use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::web::Data;
use actix_web::ResponseError;
use tracing::warn;

use crate::config::Config;
use crate::error::Error;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Rejects mutating requests that don't carry the configured api key.
pub async fn require_api_key(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    if is_safe(req.method()) || is_authorized(&req) {
        let res = next.call(req).await?;
        return Ok(res.map_into_left_body::<BoxBody>());
    }

    warn!("rejected {} {}: invalid or missing token", req.method(), req.path());
    let response = Error::Unauthorized.error_response();

    Ok(req.into_response(response).map_into_right_body())
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn is_authorized(req: &ServiceRequest) -> bool {
    let expected = match req
        .app_data::<Data<Config>>()
        .and_then(|config| config.api_key.clone())
    {
        Some(key) => key,
        None => return false,
    };

    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |token| token == expected)
}
