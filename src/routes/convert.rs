//! HTML to PDF conversion endpoint
//!
//! `POST /` accepts raw HTML or a JSON envelope, optionally with layout
//! options in the query string, and answers with the rendered PDF.

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::Response,
    routing::post,
    Router,
};

use crate::error::{AppError, Result};
use crate::options::{OptionsPatch, PdfOptions};
use crate::request::RenderRequest;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_DISPOSITION: &str = "attachment; filename=generated.pdf";

/// Create the conversion router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(convert))
}

/// Render the submitted HTML into a PDF
async fn convert(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let query = query_options(&uri)?;
    let request = RenderRequest::from_parts(&headers, body)?;

    let defaults = state.defaults().await;
    let options = PdfOptions::resolve(&defaults, query.as_ref(), request.options())?;
    let html = request.into_html();

    tracing::info!(
        "Rendering {} bytes of HTML (page_size={}, orientation={})",
        html.len(),
        options.page_size,
        options.orientation
    );

    let pdf = state.renderer().render(&options, html).await?;

    tracing::info!("Generated PDF of {} bytes", pdf.len());
    pdf_response(pdf)
}

/// Options carried in the query string, if any
fn query_options(uri: &Uri) -> Result<Option<OptionsPatch>> {
    if uri.query().map_or(true, str::is_empty) {
        return Ok(None);
    }

    let Query(patch) = Query::<OptionsPatch>::try_from_uri(uri)
        .map_err(|e| AppError::BadRequest(format!("Invalid query string: {}", e.body_text())))?;

    Ok((!patch.is_empty()).then_some(patch))
}

fn pdf_response(pdf: Vec<u8>) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(header::CONTENT_DISPOSITION, PDF_DISPOSITION)
        .header(header::CONTENT_LENGTH, pdf.len())
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_options() {
        let uri: Uri = "/?page-size=A4&margin-top=10mm&background=false&foo=bar"
            .parse()
            .unwrap();
        let patch = query_options(&uri).unwrap().unwrap();
        assert_eq!(patch.page_size.as_deref(), Some("A4"));

        let options = PdfOptions::default().apply(&patch).unwrap();
        assert_eq!(options.margin_top.as_str(), "0.394in");
        assert!(!options.background);
    }

    #[test]
    fn test_no_query() {
        assert!(query_options(&"/".parse().unwrap()).unwrap().is_none());
        assert!(query_options(&"/?".parse().unwrap()).unwrap().is_none());
        assert!(query_options(&"/?unrelated=1".parse().unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_pdf_response_headers() {
        let response = pdf_response(b"%PDF-1.4".to_vec()).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PDF_CONTENT_TYPE);
        assert_eq!(response.headers()[header::CONTENT_DISPOSITION], PDF_DISPOSITION);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "8");
    }
}
