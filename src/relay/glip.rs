use std::time::Duration;

use actix_web::web::Bytes;
use futures::future::{FutureExt as _, LocalBoxFuture};

use super::{Relay, RelayError};
use crate::card::NotificationCard;

/// Response bodies of incoming-webhook endpoints are tiny; cap what we buffer.
const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Posts cards as JSON to a RingCentral (Glip) incoming webhook.
#[derive(Clone)]
pub struct HttpRelay {
    http: awc::Client,
}

impl std::fmt::Debug for HttpRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRelay").finish()
    }
}

impl HttpRelay {
    pub fn new(timeout: Duration) -> Self {
        let http = awc::Client::builder().timeout(timeout).finish();
        Self { http }
    }

    async fn try_post(&self, url: &str, card: &NotificationCard) -> Result<Bytes, RelayError> {
        let mut resp = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .send_json(card)
            .await
            .map_err(|err| RelayError::Send(err.to_string()))?;
        let body = resp
            .body()
            .limit(MAX_RESPONSE_BYTES)
            .await
            .map_err(|err| RelayError::Body(err.to_string()))?;

        if !resp.status().is_success() {
            return Err(RelayError::Status {
                status: resp.status(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        tracing::info!(status = resp.status().as_u16(), "Relayed card");
        Ok(body)
    }
}

impl Relay for HttpRelay {
    fn post_card<'a>(
        &'a self,
        url: &'a str,
        card: &'a NotificationCard,
    ) -> LocalBoxFuture<'a, Result<Bytes, RelayError>> {
        self.try_post(url, card)
            .map(|res| {
                if let Err(err) = &res {
                    tracing::error!("Failed relaying card: {}", err);
                }
                res
            })
            .boxed_local()
    }
}
