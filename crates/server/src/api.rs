//! HTTP surface of the service: `GET /v1/face-detect?image_url=<url>`.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use facedetect_core::detection::domain::face_detector::{DetectError, FaceDetector};
use facedetect_core::download::domain::downloader::{
    validate_image_url, DownloadError, Downloader,
};
use facedetect_core::shared::face::Face;

/// Capabilities shared by every request.
pub struct AppState {
    downloader: Arc<dyn Downloader>,
    detector: Arc<dyn FaceDetector>,
}

impl AppState {
    pub fn new(downloader: Arc<dyn Downloader>, detector: Arc<dyn FaceDetector>) -> Self {
        Self {
            downloader,
            detector,
        }
    }
}

#[derive(Deserialize)]
pub struct FaceDetectQuery {
    image_url: Option<String>,
}

#[derive(Serialize)]
pub struct FacesResponse {
    #[serde(rename = "Faces")]
    pub faces: Vec<Face>,
}

/// Client-facing failures. The display text is the response body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("image_url query parameter missing")]
    MissingImageUrl,
    #[error("image_url is not a valid url")]
    InvalidUrl,
    #[error("image_url scheme must be http or https")]
    UnsupportedScheme,
    #[error("image download failed")]
    Download(#[source] DownloadError),
    #[error("unsupported image format")]
    UnsupportedFormat,
    #[error("an internal error happened during face detection")]
    Internal,
}

impl From<DetectError> for ApiError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::ImageDecode(e) => {
                log::info!("Rejecting undecodable image: {e}");
                ApiError::UnsupportedFormat
            }
            other => {
                log::error!("Face detection failed: {other}");
                ApiError::Internal
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/v1/face-detect").route(web::get().to(face_detect)));
}

async fn face_detect(
    state: web::Data<AppState>,
    query: web::Query<FaceDetectQuery>,
) -> Result<HttpResponse, ApiError> {
    let image_url = query
        .into_inner()
        .image_url
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingImageUrl)?;

    validate_image_url(&image_url).map_err(|e| match e {
        DownloadError::UnsupportedScheme(_) => ApiError::UnsupportedScheme,
        _ => ApiError::InvalidUrl,
    })?;

    let downloader = Arc::clone(&state.downloader);
    let detector = Arc::clone(&state.detector);
    let faces = web::block(move || -> Result<Vec<Face>, ApiError> {
        let body = downloader.download(&image_url).map_err(|e| {
            log::info!("Download of {image_url} failed: {e}");
            ApiError::Download(e)
        })?;
        Ok(detector.detect_faces(&body)?)
    })
    .await
    .map_err(|e| {
        log::error!("Detection worker failed: {e}");
        ApiError::Internal
    })??;

    Ok(HttpResponse::Ok().json(FacesResponse { faces }))
}
