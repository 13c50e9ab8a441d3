use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use serde_json::Value;
use tracing::Instrument as _;

use crate::{
    classify,
    http::Webhook,
    payload::MalformedPayload,
    relay::{Relay, RelayError},
    targets::TargetStore,
    transform,
};

/// Body returned when a recognized delivery is intentionally not relayed.
pub const SKIP: &str = "skip";

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("id required")]
    MissingId,
    #[error("webhook not exist")]
    UnknownWebhook,
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] MalformedPayload),
    #[error("relay failed: {0}")]
    Relay(#[from] RelayError),
}

impl ResponseError for HookError {
    fn status_code(&self) -> StatusCode {
        match self {
            HookError::MissingId => StatusCode::BAD_REQUEST,
            HookError::UnknownWebhook => StatusCode::NOT_FOUND,
            HookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            HookError::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// `POST /gh/webhook/{id}`: turns the delivery into a card and relays it to
/// the chat endpoint registered under `id`.
pub async fn relay_hook<S, R>(
    req: HttpRequest,
    Webhook(payload): Webhook<Value>,
    targets: web::Data<S>,
    relay: web::Data<R>,
) -> Result<HttpResponse, HookError>
where
    S: TargetStore + 'static,
    R: Relay + 'static,
{
    let id = req
        .match_info()
        .get("id")
        .filter(|id| !id.is_empty())
        .ok_or(HookError::MissingId)?;
    let target = targets.lookup(id).ok_or_else(|| {
        tracing::info!(id, "Delivery for unknown webhook");
        HookError::UnknownWebhook
    })?;

    let rule = classify::matching_rule(&payload);
    let span = tracing::info_span!("delivery", id, category = ?rule.category);
    async move {
        let card = match transform::render(rule, &payload)? {
            Some(card) => card,
            None => {
                tracing::info!("Event is not notifiable, skipping");
                return Ok(HttpResponse::Ok().body(SKIP));
            }
        };

        let body = relay.post_card(&target.rc_webhook, &card).await?;
        Ok::<_, HookError>(HttpResponse::Ok().body(body))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, sync::Arc};

    use actix_web::{
        test::{self, TestRequest},
        web::Bytes,
        App,
    };
    use futures::future::{self, FutureExt as _, LocalBoxFuture};
    use serde_json::json;

    use super::*;
    use crate::{
        card::NotificationCard,
        http::WebhookConfig,
        signature,
        targets::Targets,
    };

    #[derive(Default)]
    struct FakeRelay {
        sent: RefCell<Vec<(String, NotificationCard)>>,
        fail: bool,
    }

    impl Relay for FakeRelay {
        fn post_card<'a>(
            &'a self,
            url: &'a str,
            card: &'a NotificationCard,
        ) -> LocalBoxFuture<'a, Result<Bytes, RelayError>> {
            if self.fail {
                return future::ready(Err(RelayError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "down".into(),
                }))
                .boxed_local();
            }
            self.sent.borrow_mut().push((url.to_owned(), card.clone()));
            future::ready(Ok(Bytes::from_static(br#"{"status":"OK"}"#))).boxed_local()
        }
    }

    fn targets() -> Targets {
        let targets = Targets::new();
        targets.insert("abc", "https://hooks.glip.com/webhook/abc");
        targets
    }

    fn push_delivery() -> Value {
        json!({
            "compare": "https://github.com/octo/hello/compare/a...b",
            "commits": [{ "message": "a", "url": "u1" }],
            "repository": {
                "full_name": "octo/hello",
                "html_url": "https://github.com/octo/hello",
            },
            "sender": {
                "login": "octocat",
                "html_url": "https://github.com/octocat",
                "avatar_url": "https://avatars.githubusercontent.com/u/1",
            },
        })
    }

    async fn call(
        relay: Arc<FakeRelay>,
        config: WebhookConfig,
        req: TestRequest,
    ) -> (StatusCode, Bytes) {
        let mut app = test::init_service(
            App::new()
                .data(targets())
                .app_data(web::Data::from(relay))
                .app_data(config)
                .route(
                    "/gh/webhook/{id}",
                    web::post().to(relay_hook::<Targets, FakeRelay>),
                )
                .route("/gh/webhook/", web::post().to(relay_hook::<Targets, FakeRelay>)),
        )
        .await;
        let resp = test::call_service(&mut app, req.to_request()).await;
        let status = resp.status();
        (status, test::read_body(resp).await)
    }

    #[actix_rt::test]
    async fn relays_card_and_returns_relay_body() {
        let relay = Arc::new(FakeRelay::default());
        let req = TestRequest::post()
            .uri("/gh/webhook/abc")
            .set_json(&push_delivery());

        let (status, body) = call(relay.clone(), WebhookConfig::default(), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(br#"{"status":"OK"}"#));
        let sent = relay.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://hooks.glip.com/webhook/abc");
        assert_eq!(sent[0].1.attachments[0].title, "New Push event");
    }

    #[actix_rt::test]
    async fn unpublished_release_is_skipped() {
        let relay = Arc::new(FakeRelay::default());
        let mut delivery = push_delivery();
        delivery["release"] = json!({ "html_url": "U" });
        delivery["action"] = json!("unpublished");
        let req = TestRequest::post().uri("/gh/webhook/abc").set_json(&delivery);

        let (status, body) = call(relay.clone(), WebhookConfig::default(), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(SKIP.as_bytes()));
        assert!(relay.sent.borrow().is_empty());
    }

    #[actix_rt::test]
    async fn missing_and_unknown_ids() {
        let relay = Arc::new(FakeRelay::default());

        let req = TestRequest::post().uri("/gh/webhook/").set_json(&push_delivery());
        let (status, body) = call(relay.clone(), WebhookConfig::default(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, Bytes::from_static(b"id required"));

        let req = TestRequest::post().uri("/gh/webhook/zzz").set_json(&push_delivery());
        let (status, body) = call(relay.clone(), WebhookConfig::default(), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Bytes::from_static(b"webhook not exist"));

        assert!(relay.sent.borrow().is_empty());
    }

    #[actix_rt::test]
    async fn malformed_payload_is_rejected() {
        let relay = Arc::new(FakeRelay::default());
        let req = TestRequest::post()
            .uri("/gh/webhook/abc")
            .set_json(&json!({ "commits": [] }));

        let (status, _) = call(relay.clone(), WebhookConfig::default(), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(relay.sent.borrow().is_empty());
    }

    #[actix_rt::test]
    async fn relay_failures_surface_as_bad_gateway() {
        let relay = Arc::new(FakeRelay {
            fail: true,
            ..FakeRelay::default()
        });
        let req = TestRequest::post()
            .uri("/gh/webhook/abc")
            .set_json(&push_delivery());

        let (status, _) = call(relay, WebhookConfig::default(), req).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[actix_rt::test]
    async fn signature_is_checked_when_configured() {
        let config = WebhookConfig::new(Some(b"secret".to_vec()));
        let body = serde_json::to_vec(&push_delivery()).expect("fixture serializes");

        let req = TestRequest::post()
            .uri("/gh/webhook/abc")
            .header("Content-Type", "application/json")
            .header(signature::HEADER, signature::sign(b"secret", &body))
            .set_payload(body.clone());
        let (status, _) = call(Arc::new(FakeRelay::default()), config.clone(), req).await;
        assert_eq!(status, StatusCode::OK);

        let req = TestRequest::post()
            .uri("/gh/webhook/abc")
            .header(signature::HEADER, signature::sign(b"guess", &body))
            .set_payload(body);
        let (status, _) = call(Arc::new(FakeRelay::default()), config, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
