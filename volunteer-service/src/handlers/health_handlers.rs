pub const LIVENESS_MESSAGE: &str = "Volunteer network server is running";

// GET /
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
