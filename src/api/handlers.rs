use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, Result},
    state::AppState,
    types::{
        CreateLinkRequest, CreateLinkResponse, DeleteResponse, LinksResponse, LoginRequest,
        LoginResponse,
    },
};

/// A wrong key is still a 200; only the payload says whether it matched.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = payload?;
    let success = request
        .key
        .as_deref()
        .is_some_and(|key| state.admin.matches(key));
    info!(success, "Admin login attempt");
    Ok(Json(LoginResponse { success }))
}

#[instrument(skip(state))]
pub async fn list_links(State(state): State<AppState>) -> Result<Json<LinksResponse>> {
    let links = state.links.list().await?;
    Ok(Json(LinksResponse { links }))
}

#[instrument(skip(state, payload))]
pub async fn create_link(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<Json<CreateLinkResponse>> {
    let Json(request) = payload?;
    let (code, url) = state.links.create(request.code, request.url).await?;
    Ok(Json(CreateLinkResponse {
        success: true,
        code,
        url,
    }))
}

#[instrument(skip(state, code))]
pub async fn delete_link(
    State(state): State<AppState>,
    code: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteResponse>> {
    let Path(code) = code.map_err(|rejection| {
        warn!(error = %rejection, "Undecodable short code in delete path");
        AppError::UnknownRoute
    })?;
    state.links.delete(&code).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// `DELETE /api/links/` names the empty code, which is deleted like any other.
#[instrument(skip(state))]
pub async fn delete_empty_code(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>> {
    state.links.delete("").await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[instrument(skip(state, code))]
pub async fn handle_short_url(
    State(state): State<AppState>,
    code: std::result::Result<Path<String>, PathRejection>,
) -> Result<Response> {
    // a code that does not decode can never have been stored
    let Path(code) = code.map_err(|rejection| {
        info!(error = %rejection, "Undecodable short code");
        AppError::NotFound
    })?;
    let url = state.links.resolve(&code).await.inspect_err(|e| {
        if matches!(e, AppError::NotFound) {
            info!(code = %code, "Short code not found");
        }
    })?;
    info!(code = %code, "Redirecting to long URL");
    Ok((StatusCode::FOUND, [(LOCATION, url)]).into_response())
}

pub async fn unknown_route() -> AppError {
    AppError::UnknownRoute
}
