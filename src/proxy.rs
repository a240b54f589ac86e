//! `GET /api/tmdb`: forwards a whitelisted set of lookups to TMDB and hands
//! the upstream JSON body back byte for byte.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::catalog::{parse_movie_id, Category, UpstreamRequest};
use crate::error::{CatalogError, CatalogResult};
use crate::pagination::clamp_page;

#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    pub endpoint: Option<String>,
    pub id: Option<String>,
    pub query: Option<String>,
    pub page: Option<String>,
    pub genre_id: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_page(raw: Option<&str>) -> CatalogResult<u32> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(CatalogError::InvalidParameter(
            "Page must be a positive integer".to_string(),
        )),
        Ok(n) => Ok(clamp_page(n.min(u32::MAX as u64) as u32)),
    }
}

/// Maps proxy parameters onto the upstream request they stand for.
///
/// Each endpoint checks its own required parameter before `page` is looked at.
pub fn resolve(params: &ProxyParams) -> CatalogResult<UpstreamRequest> {
    let endpoint = present(&params.endpoint)
        .ok_or(CatalogError::MissingParameter("Endpoint parameter is required"))?;
    let page = || parse_page(present(&params.page));

    match endpoint {
        "movie" => {
            let raw_id = present(&params.id)
                .ok_or(CatalogError::MissingParameter("Movie ID is required"))?;
            let id = parse_movie_id(raw_id).ok_or_else(|| {
                CatalogError::InvalidParameter("Movie ID must be numeric".to_string())
            })?;
            Ok(UpstreamRequest::movie(id).param("page", page()?))
        }
        "search" => {
            let query = present(&params.query).ok_or(CatalogError::MissingParameter(
                "Query parameter is required for search",
            ))?;
            UpstreamRequest::search(query, page()?)
        }
        "genre" => {
            let genre_id = present(&params.genre_id)
                .ok_or(CatalogError::MissingParameter("Genre ID is required"))?;
            UpstreamRequest::genre(genre_id, page()?)
        }
        other => {
            let category: Category = other.parse()?;
            Ok(UpstreamRequest::category(category, page()?))
        }
    }
}

/// Forwards the upstream body as-is; it is only checked to be JSON.
pub async fn handle_proxy(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, CatalogError> {
    let request = resolve(&params)?;
    info!("Proxying {}", request.path);
    let body = state.catalog.fetch_body(&request).await?;
    serde_json::from_slice::<IgnoredAny>(&body)
        .map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
