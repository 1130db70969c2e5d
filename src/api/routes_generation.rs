use super::*;

pub(super) async fn generate_level(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Json<ApiResponse<GenerateResponse>> {
    let seed = req.seed.unwrap_or_else(rand::random::<u64>);
    let result = state.generator.generate(&mut SeededRng::new(seed));
    debug!(seed, coins = result.level.coins.len(), "served generated level");

    let validation = if req.constraints.is_empty() {
        serde_json::json!({ "skipped": true })
    } else {
        let report = constraints::validate(&result.level, state.config(), &req.constraints);
        serde_json::to_value(&report).unwrap_or(serde_json::json!({ "error": "serialize failed" }))
    };

    Json(ApiResponse::success(GenerateResponse {
        seed,
        level: result.level,
        metrics: result.metrics,
        validation,
    }))
}

pub(super) async fn validate_level(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Json<ApiResponse<ValidateResult>> {
    let result = if req.constraints.is_empty() {
        constraints::validate_all(&req.level, state.config())
    } else {
        constraints::validate(&req.level, state.config(), &req.constraints)
    };
    Json(ApiResponse::success(result))
}
