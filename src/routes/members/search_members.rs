use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;

use crate::{
    domain::{MemberAPIError, MemberSearchCondition, MemberTeamRow},
    services::member_search::search,
    AppState,
};

#[tracing::instrument(name = "Search members route handler", skip_all)]
pub async fn search_members(
    State(state): State<AppState>,
    Query(condition): Query<MemberSearchCondition>,
) -> Result<(StatusCode, Json<Vec<MemberTeamRow>>), MemberAPIError> {
    tracing::debug!("condition: {:?}", condition);

    let member_store = state.member_store.read().await;
    let rows = search(&*member_store, &condition)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;

    Ok((StatusCode::OK, Json(rows)))
}
