use secstr::SecStr;
use serde::{Deserialize, Deserializer};

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

fn default_relay_timeout_secs() -> u64 {
    10
}

/// GitHub refuses to send deliveries larger than 25 MiB.
fn default_max_payload_bytes() -> usize {
    25 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// `id=url` pairs.
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_opt_secstr")]
    pub webhook_secret: Option<SecStr>,
    #[serde(default = "default_relay_timeout_secs")]
    pub relay_timeout_secs: u64,
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("HOOKCARD_").from_env()
    }
}

fn deserialize_opt_secstr<'de, D>(de: D) -> Result<Option<SecStr>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(|o| {
        o.filter(|s| !s.is_empty())
            .map(|s| SecStr::new(s.into_bytes()))
    })
}
