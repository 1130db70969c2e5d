//! Access control for the level endpoints. `/health` and `/config` stay open;
//! `/generate` and `/validate` need the shared token when one is configured
//! and draw from a per-client budget of levels per second.

use std::time::{Duration, Instant};

use axum::http::HeaderMap;

use super::*;

pub(super) const API_TOKEN_ENV: &str = "CHASM_API_TOKEN";
pub(super) const API_RATE_LIMIT_ENV: &str = "CHASM_API_RATE_LIMIT_PER_SEC";
pub(super) const DEFAULT_LEVELS_PER_SEC: u32 = 180;

const QUOTA_WINDOW: Duration = Duration::from_secs(1);
/// Past this many tracked clients, idle windows are dropped.
const MAX_TRACKED_CLIENTS: usize = 1024;

#[derive(Clone)]
pub(super) struct LevelAccess {
    token: Option<Arc<str>>,
    quota: Arc<LevelQuota>,
}

pub(super) struct LevelQuota {
    levels_per_sec: u32,
    windows: Mutex<HashMap<String, QuotaWindow>>,
}

struct QuotaWindow {
    opened: Instant,
    served: u32,
}

impl LevelAccess {
    pub(super) fn new(token: Option<&str>, levels_per_sec: u32) -> Self {
        Self {
            token: token.map(Arc::from),
            quota: Arc::new(LevelQuota::new(levels_per_sec)),
        }
    }

    pub(super) fn from_env() -> Self {
        let token = std::env::var(API_TOKEN_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let levels_per_sec = match std::env::var(API_RATE_LIMIT_ENV) {
            Ok(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring unparsable {API_RATE_LIMIT_ENV}");
                DEFAULT_LEVELS_PER_SEC
            }),
            Err(_) => DEFAULT_LEVELS_PER_SEC,
        };
        info!(
            token_required = token.is_some(),
            levels_per_sec, "level endpoints guarded"
        );
        Self::new(token.as_deref(), levels_per_sec)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.token.as_deref() else {
            return true;
        };
        let bearer = header_str(headers, "authorization").and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        });
        let api_key = header_str(headers, "x-api-key");
        bearer == Some(expected) || api_key == Some(expected)
    }
}

impl LevelQuota {
    fn new(levels_per_sec: u32) -> Self {
        Self {
            levels_per_sec: levels_per_sec.max(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Charge one level to `client`. False once the client has used its
    /// budget for the current window.
    fn admit(&self, client: &str, now: Instant) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if windows.len() > MAX_TRACKED_CLIENTS {
            windows.retain(|_, w| now.duration_since(w.opened) < QUOTA_WINDOW);
        }
        let window = windows.entry(client.to_string()).or_insert(QuotaWindow {
            opened: now,
            served: 0,
        });
        if now.duration_since(window.opened) >= QUOTA_WINDOW {
            window.opened = now;
            window.served = 0;
        }
        if window.served >= self.levels_per_sec {
            return false;
        }
        window.served += 1;
        true
    }
}

/// First hop of `x-forwarded-for`, else `x-real-ip`, else one shared local key.
fn client_key(headers: &HeaderMap) -> String {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or("local")
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

pub(super) async fn guard_levels(
    State(access): State<LevelAccess>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    if !access.authorized(req.headers()) {
        debug!(path = %req.uri().path(), "level request without valid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::err(format!(
                "level endpoints need {API_TOKEN_ENV}: send Authorization: Bearer <token> or x-api-key"
            ))),
        )
            .into_response();
    }

    let client = client_key(req.headers());
    if !access.quota.admit(&client, Instant::now()) {
        warn!(%client, path = %req.uri().path(), "level quota exhausted");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ApiResponse::err(format!(
                "level quota exhausted for {client}: {} per second",
                access.quota.levels_per_sec
            ))),
        )
            .into_response();
    }

    next.run(req).await
}
