//! `GET /healthcheck` (docs/ARCHITECTURE.md §6.1).

/// Liveness probe. No dependency checks: if the process can schedule this
/// handler, it's up.
pub async fn healthcheck() -> &'static str {
    "OK"
}
