use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::StatusCode,
    response::Json,
};

use super::AppState;
use crate::application::{
    dto::{
        CreateLabelRequest, MatchingLabelsResponse, MessageResponse, SearchLabelsQuery,
        UserLabelsQuery, UserLabelsResponse,
    },
    use_cases::{CreateLabelUseCase, GetUserLabelsUseCase, SearchLabelsUseCase},
};
use crate::presentation::middleware::{
    auth::{AuthError, AuthenticatedUser},
    error::AppError,
};

/// List every label owned by the authenticated user
///
/// The auth layer has already checked that `username` matches the token.
pub async fn get_user_labels(
    State(state): State<AppState>,
    Query(query): Query<UserLabelsQuery>,
) -> Result<Json<UserLabelsResponse>, AppError> {
    let use_case = GetUserLabelsUseCase::new(
        state.labels.clone(),
        state.storage.clone(),
        state.missing_image_policy,
    );

    let labeled_images = use_case.execute(&query.username).await?;
    Ok(Json(UserLabelsResponse { labeled_images }))
}

/// Find labels by name across all users
pub async fn search_labels(
    State(state): State<AppState>,
    Query(query): Query<SearchLabelsQuery>,
) -> Result<Json<MatchingLabelsResponse>, AppError> {
    let label_name = query
        .label_name
        .ok_or_else(|| AppError::invalid_field("labelName", "field is required"))?;

    let use_case = SearchLabelsUseCase::new(
        state.labels.clone(),
        state.storage.clone(),
        state.missing_image_policy,
    );

    let matching_labels = use_case.execute(&label_name).await?;
    Ok(Json(MatchingLabelsResponse { matching_labels }))
}

/// Store a label image and record its metadata
///
/// # Errors
/// 400 for a malformed or incomplete body, 413 past the body limit, 401 when the
/// body names another user, 500 when either store fails
pub async fn create_label(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let new_label = CreateLabelRequest::from_slice(&body?)?.validate()?;

    if new_label.username != user.username {
        tracing::warn!(
            token_username = %user.username,
            body_username = %new_label.username,
            "Create request names a different user than the token"
        );
        return Err(AuthError::UsernameMismatch.into());
    }

    let use_case = CreateLabelUseCase::new(state.labels.clone(), state.storage.clone());
    use_case.execute(new_label).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Label created successfully."))))
}
