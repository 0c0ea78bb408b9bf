//! Provider catalog pass-throughs, served from the TTL cache.

use axum::extract::State;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use adgen_models::{Avatar, VoiceOption};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListAvatarsResponse {
    pub avatars: Vec<Avatar>,
}

#[derive(Debug, Serialize)]
pub struct ListVoicesResponse {
    pub voices: Vec<VoiceOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalanceResponse {
    pub remaining_credits: i64,
}

fn catalog_cache_headers(ttl_secs: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        format!("public, s-maxage={ttl_secs}").parse().unwrap(),
    );
    headers
}

/// GET /list-avatars
pub async fn list_avatars(
    State(state): State<AppState>,
) -> ApiResult<(HeaderMap, Json<ListAvatarsResponse>)> {
    let provider = state.provider.clone();
    let avatars = state
        .catalog
        .avatars(|| async move { provider.list_avatars().await })
        .await?;

    Ok((
        catalog_cache_headers(state.config.catalog_cache_ttl.as_secs()),
        Json(ListAvatarsResponse { avatars }),
    ))
}

/// GET /list-voices
pub async fn list_voices(
    State(state): State<AppState>,
) -> ApiResult<(HeaderMap, Json<ListVoicesResponse>)> {
    let provider = state.provider.clone();
    let voices = state
        .catalog
        .voices(|| async move { provider.list_voices().await })
        .await?;

    Ok((
        catalog_cache_headers(state.config.catalog_cache_ttl.as_secs()),
        Json(ListVoicesResponse { voices }),
    ))
}

/// GET /credit-balance
pub async fn credit_balance(
    State(state): State<AppState>,
) -> ApiResult<(HeaderMap, Json<CreditBalanceResponse>)> {
    let provider = state.provider.clone();
    let balance = state
        .catalog
        .credit_balance(|| async move { provider.credit_balance().await })
        .await?;

    Ok((
        catalog_cache_headers(state.config.catalog_cache_ttl.as_secs()),
        Json(CreditBalanceResponse {
            remaining_credits: balance.remaining_credits,
        }),
    ))
}
