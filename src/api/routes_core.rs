use super::*;

pub(super) async fn health() -> Json<ApiResponse<String>> {
    Json(ApiResponse::ok())
}

pub(super) async fn get_config(State(state): State<AppState>) -> Json<ApiResponse<LevelConfig>> {
    Json(ApiResponse::success(state.config().clone()))
}
