// ABOUTME: HTTP request handlers for tag search
// ABOUTME: Finds users carrying every requested tag

use axum::{extract::State, Json};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use tracing::info;
use usertags_tags::TagIndex;

use crate::error::ApiResult;
use crate::state::AppState;

/// Query string for tag search: `?tags=friendly&tags=adventurous`
///
/// Each value is one tag, so a tag may itself contain commas.
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tags: Vec<String>,
    pub users: Vec<String>,
}

/// Users associated with all of the given tags
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let index = TagIndex::new(state.store(), &query.tags);

    info!("Searching users by {} tag(s)", index.tags().len());

    let users = index.search().await?;

    Ok(Json(SearchResponse {
        tags: index.tags().to_vec(),
        users,
    }))
}
