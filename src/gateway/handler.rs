use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, instrument, warn};

use crate::embedding::DEFAULT_EXTRACTOR_MODEL;

use super::error::GatewayError;
use super::payload::{DetectResponse, HEALTH_STATUS_MESSAGE, HealthResponse, ReloadResponse};
use super::state::HandlerState;
use super::{
    VISAGE_STATUS_DETECTED, VISAGE_STATUS_HEADER, VISAGE_STATUS_HEALTHY, VISAGE_STATUS_RELOADED,
    VISAGE_STATUS_STALE,
};

/// Multipart field carrying the image.
pub const UPLOAD_FIELD_NAME: &str = "file";

pub(crate) const NO_FILE_PART: &str = "No file part";
pub(crate) const NO_SELECTED_FILE: &str = "No selected file";
pub(crate) const EMPTY_FILE: &str = "Empty file";

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(VISAGE_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    (
        StatusCode::OK,
        status_headers(VISAGE_STATUS_HEALTHY),
        Json(HealthResponse {
            status: HEALTH_STATUS_MESSAGE,
            loaded_faces: state.cache.len(),
        }),
    )
        .into_response()
}

/// Runs a full sync and waits for it, or joins the one already running.
///
/// The sync lives on its own task, so a client that disconnects mid-reload does not stop
/// the commit. A failed store listing still answers 200 with `count: 0`; the previous
/// snapshot keeps serving detect requests.
#[instrument(skip(state))]
pub async fn reload_handler(State(state): State<HandlerState>) -> Response {
    if state.orchestrator.is_syncing() {
        debug!("Reload requested while a sync is running, joining it");
    }

    let (count, visage_status) = match state.orchestrator.sync().await {
        Ok(report) => {
            info!(%report, "Database reloaded");
            (report.succeeded, VISAGE_STATUS_RELOADED)
        }
        Err(e) => {
            warn!(error = %e, "Reload failed, serving previous snapshot");
            (0, VISAGE_STATUS_STALE)
        }
    };

    (
        StatusCode::OK,
        status_headers(visage_status),
        Json(ReloadResponse::new(count)),
    )
        .into_response()
}

#[instrument(skip(state, multipart), fields(faces = tracing::field::Empty))]
pub async fn detect_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError> {
    let image = read_upload(multipart).await?;

    // One snapshot for every face in this request, even if a reload commits meanwhile.
    let snapshot = state.cache.current();

    let faces = state
        .extractor
        .extract(&image, DEFAULT_EXTRACTOR_MODEL)
        .await
        .map_err(|e| {
            error!(error = %e, bytes = image.len(), "Face extraction failed");
            GatewayError::from(e)
        })?;
    tracing::Span::current().record("faces", faces.len());

    let results = state.matcher.match_faces(&snapshot, &faces);
    debug!(
        faces = results.len(),
        matched = results.iter().filter(|r| r.is_match()).count(),
        "Detect complete"
    );

    Ok((
        StatusCode::OK,
        status_headers(VISAGE_STATUS_DETECTED),
        Json(DetectResponse::new(results)),
    )
        .into_response())
}

/// Pulls the bytes of the `file` part out of a multipart upload.
///
/// Parts without a filename are ordinary form fields and do not count as the upload.
pub(crate) async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, GatewayError> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e, "Detect request is not multipart");
        GatewayError::InvalidRequest(NO_FILE_PART.to_string())
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(GatewayError::InvalidRequest(NO_SELECTED_FILE.to_string()));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Err(GatewayError::InvalidRequest(EMPTY_FILE.to_string()));
        }

        debug!(file_name = %file_name, bytes = bytes.len(), "Received upload");
        return Ok(bytes.to_vec());
    }

    Err(GatewayError::InvalidRequest(NO_FILE_PART.to_string()))
}

fn multipart_error(err: MultipartError) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(err.body_text())
    } else {
        GatewayError::InvalidRequest(err.body_text())
    }
}
