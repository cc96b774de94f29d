use axum::{body::Bytes, http::StatusCode};
use tracing::info;

/// POST /payments/sepay/webhook
///
/// Payment notifications are only recorded in the log; there is no payment
/// processing behind this route.
pub async fn sepay_webhook(body: Bytes) -> StatusCode {
    info!(
        body = %String::from_utf8_lossy(&body),
        "sepay webhook received"
    );
    StatusCode::OK
}
