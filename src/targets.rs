use dashmap::DashMap;

/// Where cards for a registered webhook are relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub rc_webhook: String,
}

pub trait TargetStore {
    fn lookup(&self, id: &str) -> Option<Target>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetParseError {
    #[error("target `{0}` must have format <id>=<url>")]
    NoSeparator(String),
    #[error("target `{0}` has an empty id")]
    EmptyId(String),
    #[error("target `{0}` must point to an http(s) URL")]
    NotHttp(String),
}

/// Registry of webhook targets keyed by webhook id.
#[derive(Debug, Default)]
pub struct Targets(DashMap<String, Target>);

impl Targets {
    pub fn new() -> Self {
        Self(DashMap::new())
    }

    /// Parses `id=url` entries; later entries replace earlier ones with the same id.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, TargetParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = Self::new();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let (id, url) = match entry.find('=') {
                Some(pos) => (entry[..pos].trim(), entry[pos + 1..].trim()),
                None => return Err(TargetParseError::NoSeparator(entry.to_owned())),
            };
            if id.is_empty() {
                return Err(TargetParseError::EmptyId(entry.to_owned()));
            }
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(TargetParseError::NotHttp(entry.to_owned()));
            }
            targets.insert(id, url);
        }
        Ok(targets)
    }

    pub fn insert(&self, id: impl Into<String>, url: impl Into<String>) -> Option<Target> {
        self.0.insert(
            id.into(),
            Target {
                rc_webhook: url.into(),
            },
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TargetStore for Targets {
    fn lookup(&self, id: &str) -> Option<Target> {
        self.0.get(id).map(|entry| entry.value().clone())
    }
}
