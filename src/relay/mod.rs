mod glip;

pub use self::glip::HttpRelay;

use actix_web::{http::StatusCode, web::Bytes};
use futures::future::LocalBoxFuture;

use crate::card::NotificationCard;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to send card: {0}")]
    Send(String),
    #[error("failed to read relay response: {0}")]
    Body(String),
    #[error("relay returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Delivers a card to a chat endpoint and yields the endpoint's response body.
///
/// Failures are reported as-is; retrying is left to the sender of the delivery.
pub trait Relay {
    fn post_card<'a>(
        &'a self,
        url: &'a str,
        card: &'a NotificationCard,
    ) -> LocalBoxFuture<'a, Result<Bytes, RelayError>>;
}
