use super::*;

pub(super) fn build_router(state: AppState, access: LevelAccess) -> Router {
    let levels = Router::new()
        .route("/generate", post(generate_level))
        .route("/validate", post(validate_level))
        .route_layer(middleware::from_fn_with_state(access, guard_levels));

    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config))
        .merge(levels)
        .with_state(state)
}
