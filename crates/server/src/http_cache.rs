//! Response cache middleware.
//!
//! Successful responses are stored under `"<METHOD>-<URI>"` and replayed on
//! later identical requests. Every response passing through carries an
//! `X-Cache` header saying whether it was replayed.

use std::sync::Arc;

use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::middleware::Next;
use actix_web::{error, web, Error, HttpResponse};

use facedetect_core::cache::domain::cache_store::{CacheError, CacheStore, CachedResponse};

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Cache handle registered as app data; without it the middleware is inert.
pub struct HttpCache {
    store: Arc<dyn CacheStore>,
}

impl HttpCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }
}

pub async fn cache_responses(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let Some(cache) = req.app_data::<web::Data<HttpCache>>().cloned() else {
        return next.call(req).await.map(ServiceResponse::map_into_boxed_body);
    };

    let key = format!("{}-{}", req.method(), req.uri());
    match cache.store.load(&key) {
        Ok(hit) => return Ok(req.into_response(replay(hit))),
        Err(CacheError::Miss) => {}
        Err(e) => log::warn!("Cache lookup for {key} failed: {e}"),
    }

    let res = next.call(req).await?;
    let mut res = if res.status() == StatusCode::OK {
        capture(&cache, &key, res).await?
    } else {
        res.map_into_boxed_body()
    };
    res.headers_mut()
        .insert(X_CACHE, HeaderValue::from_static("MISS"));
    Ok(res)
}

fn replay(hit: CachedResponse) -> HttpResponse {
    let status = StatusCode::from_u16(hit.status).unwrap_or(StatusCode::OK);
    let mut builder = HttpResponse::build(status);
    for (name, value) in &hit.headers {
        builder.append_header((name.as_str(), value.as_str()));
    }
    builder
        .insert_header((X_CACHE, HeaderValue::from_static("HIT")))
        .body(hit.body)
}

/// Buffers the body, stores the response and hands back an equivalent one.
async fn capture<B>(
    cache: &HttpCache,
    key: &str,
    res: ServiceResponse<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
{
    let (req, res) = res.into_parts();
    let (head, body) = res.into_parts();
    let bytes = body::to_bytes(body).await.map_err(|e| {
        let e: Box<dyn std::error::Error> = e.into();
        error::ErrorInternalServerError(e.to_string())
    })?;

    let headers = head
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let stored = CachedResponse {
        status: head.status().as_u16(),
        headers,
        body: bytes.to_vec(),
    };
    if let Err(e) = cache.store.save(key, stored) {
        log::warn!("Failed to cache response for {key}: {e}");
    }

    Ok(ServiceResponse::new(req, head.set_body(bytes).map_into_boxed_body()))
}
