use axum::http::StatusCode;

/// Liveness probe -- always returns 200 OK.
///
/// Only checks that the process is running and responsive.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn liveness_handler_always_returns_200() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }
}
