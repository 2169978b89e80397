//! Cross-origin access for browser clients: any origin is allowed and echoed
//! back.

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{Error, HttpResponse};

const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::HEAD, Method::OPTIONS];

pub async fn cors(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let Some(origin) = req.headers().get(header::ORIGIN).cloned() else {
        return next.call(req).await.map(ServiceResponse::map_into_boxed_body);
    };

    if req.method() == Method::OPTIONS {
        let resp = preflight(&req, origin);
        return Ok(req.into_response(resp));
    }

    let mut res = next.call(req).await?;
    let headers = res.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    Ok(res.map_into_boxed_body())
}

fn preflight(req: &ServiceRequest, origin: HeaderValue) -> HttpResponse {
    let requested = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_METHOD)
        .and_then(|v| Method::from_bytes(v.as_bytes()).ok());

    match requested {
        None => HttpResponse::BadRequest().finish(),
        Some(method) if !ALLOWED_METHODS.contains(&method) => {
            HttpResponse::MethodNotAllowed().finish()
        }
        Some(method) => HttpResponse::Ok()
            .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, method.as_str()))
            .insert_header((header::VARY, "Origin"))
            .finish(),
    }
}
