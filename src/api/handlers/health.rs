/*
 * Responsibility
 * - GET /healthz (liveness check, fixed body)
 */
pub async fn healthz() -> &'static str {
    "OK"
}
