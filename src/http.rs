use actix_web::{
    dev::Payload, error::ResponseError, http::StatusCode, web::Bytes, FromRequest, HttpRequest,
};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::signature::{self, Mismatch, Signature};

/// JSON body of a GitHub delivery, authenticated when a secret is configured.
#[derive(Debug, Clone)]
pub struct Webhook<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("failed parsing signature: {0}")]
    SignatureParseError(#[from] signature::Error),
    #[error("signature doesn't match")]
    InvalidSignature,
    #[error("HMAC key has invalid length")]
    HmacInvalidLength,
    #[error("failed reading request data: {0}")]
    ActixError(#[from] actix_web::Error),
    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<Mismatch> for WebhookError {
    fn from(err: Mismatch) -> Self {
        match err {
            Mismatch::Digest => Self::InvalidSignature,
            Mismatch::InvalidKey => Self::HmacInvalidLength,
        }
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SignatureParseError(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookError::HmacInvalidLength => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::JsonError(_) => StatusCode::BAD_REQUEST,
            WebhookError::ActixError(err) => err.as_response_error().status_code(),
        }
    }
}

/// Without a key deliveries are accepted unsigned.
#[derive(Debug, Default, Clone)]
pub struct WebhookConfig {
    pub key: Option<Vec<u8>>,
}

impl WebhookConfig {
    pub fn new(key: Option<Vec<u8>>) -> Self {
        Self { key }
    }
}

impl<T> FromRequest for Webhook<T>
where
    T: serde::de::DeserializeOwned,
{
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;
    type Config = WebhookConfig;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(Bytes::from_request(&req, payload).map(
            move |bytes| -> Result<Self, Self::Error> {
                let bytes = bytes?;

                if let Some(key) = req.app_data::<Self::Config>().and_then(|c| c.key.as_ref()) {
                    Signature::from_headers(req.headers())?.verify(key, &bytes)?;
                }

                Ok(Self(serde_json::from_slice(&bytes)?))
            },
        ))
    }
}
