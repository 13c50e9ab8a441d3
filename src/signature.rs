use hmac::{Hmac, Mac as _, NewMac as _};
use sha2::Sha256;

pub const HEADER: &str = "X-Hub-Signature-256";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("`X-Hub-Signature-256` header isn't found")]
    HeaderNotFound,
    #[error("`X-Hub-Signature-256` isn't valid ASCII")]
    NotAscii,
    #[error("`X-Hub-Signature-256` must start with `sha256=`")]
    InvalidPrefix,
    #[error("signature must be 64 hex digits")]
    NotHex,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("signature doesn't match")]
    Digest,
    #[error("HMAC key has invalid length")]
    InvalidKey,
}

/// HMAC-SHA256 of a delivery body, as sent by GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; 32]);

impl Signature {
    pub fn from_headers(headers: &actix_web::http::HeaderMap) -> Result<Self, Error> {
        let value = headers.get(HEADER).ok_or(Error::HeaderNotFound)?;
        value.to_str().map_err(|_| Error::NotAscii)?.parse()
    }

    /// Checks the signature in constant time.
    pub fn verify(&self, key: &[u8], body: &[u8]) -> Result<(), Mismatch> {
        let mut mac = Hmac::<Sha256>::new_varkey(key).map_err(|_| Mismatch::InvalidKey)?;
        mac.update(body);
        mac.verify(&self.0).map_err(|_| Mismatch::Digest)
    }
}

impl std::str::FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digest = s.trim().strip_prefix("sha256=").ok_or(Error::InvalidPrefix)?;
        hex::FromHex::from_hex(digest)
            .map(Self)
            .map_err(|_| Error::NotHex)
    }
}

#[cfg(test)]
pub(crate) fn sign(key: &[u8], body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_varkey(key).expect("HMAC accepts any key length");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
