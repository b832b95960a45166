//! API handlers for the PDF generation server
//!
//! - `GET /health`
//! - `POST /generate-pdf`

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use pdfgen_core::GenerateRequest;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ServerError;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdfgen-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Generate request read from either a JSON or a form-encoded body.
///
/// `application/x-www-form-urlencoded` selects the form decoder; every other
/// content type goes through the JSON extractor and its checks.
pub struct GeneratePayload(pub GenerateRequest);

#[async_trait]
impl<S> FromRequest<S> for GeneratePayload
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(request) = Form::<GenerateRequest>::from_request(req, state)
                .await
                .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
            Ok(Self(request))
        } else {
            let Json(request) = Json::<GenerateRequest>::from_request(req, state)
                .await
                .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
            Ok(Self(request))
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

/// Handler: POST /generate-pdf
///
/// Responds with the PDF as an attachment, or 403 with `{"message": ...}`.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    GeneratePayload(request): GeneratePayload,
) -> Result<Response, ServerError> {
    info!(
        "Generate request: header={}, footer={}, watermark={}, original_cv={}",
        request.header_source().is_some(),
        request.footer_source().is_some(),
        request.watermark_source().is_some(),
        request.original_cv_source().is_some(),
    );
    debug!("Body: {} bytes", request.body.len());

    let pdf = tokio::time::timeout(state.timeout, state.pipeline.generate(&request))
        .await
        .map_err(|_| ServerError::Timeout(state.timeout.as_millis() as u64))??;

    Ok(pdf_response(pdf))
}

fn pdf_response(pdf: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                r#"attachment; filename="document.pdf""#.to_string(),
            ),
            (header::CONTENT_LENGTH, pdf.len().to_string()),
        ],
        pdf,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_form_content_type_detection() {
        assert!(is_form(&headers("application/x-www-form-urlencoded")));
        assert!(is_form(&headers("application/x-www-form-urlencoded; charset=UTF-8")));
        assert!(!is_form(&headers("application/json")));
        assert!(!is_form(&HeaderMap::new()));
    }
}
