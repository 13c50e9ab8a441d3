use serde_json::Value;

/// Delivery is missing one of the objects every card is built from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedPayload {
    #[error("`{0}` is missing from payload")]
    Missing(&'static str),
    #[error("`{0}` must be an object")]
    NotObject(&'static str),
}

/// Author block of a card. Absent or non-string members render blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub login: String,
    pub html_url: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
    pub html_url: String,
}

impl User {
    pub fn sender(payload: &Value) -> Result<Self, MalformedPayload> {
        let sender = object(payload, "sender")?;
        Ok(Self {
            login: member(sender, "login"),
            html_url: member(sender, "html_url"),
            avatar_url: member(sender, "avatar_url"),
        })
    }
}

impl Repository {
    pub fn of(payload: &Value) -> Result<Self, MalformedPayload> {
        let repository = object(payload, "repository")?;
        Ok(Self {
            full_name: member(repository, "full_name"),
            html_url: member(repository, "html_url"),
        })
    }
}

fn object<'a>(payload: &'a Value, field: &'static str) -> Result<&'a Value, MalformedPayload> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(MalformedPayload::Missing(field)),
        Some(value) if value.is_object() => Ok(value),
        Some(_) => Err(MalformedPayload::NotObject(field)),
    }
}

fn member(object: &Value, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Whether `key` is present with a value other than `null`, `false`, `0` or `""`.
pub fn has(payload: &Value, key: &str) -> bool {
    payload.get(key).map_or(false, is_truthy)
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolves a dotted path with optional indices, e.g. `pages[0].html_url`.
///
/// Any missing segment, out-of-range index or unparseable index yields `None`.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| {
        let (key, mut rest) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };
        let mut current = if key.is_empty() {
            current
        } else {
            current.get(key)?
        };
        while let Some(tail) = rest.strip_prefix('[') {
            let end = tail.find(']')?;
            let index: usize = tail[..end].parse().ok()?;
            current = current.get(index)?;
            rest = &tail[end + 1..];
        }
        if rest.is_empty() {
            Some(current)
        } else {
            None
        }
    })
}

/// String at `path`, if any.
pub fn lookup_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

/// `created_at` → `created at`.
pub fn humanize(action: &str) -> String {
    action.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_follows_keys_and_indices() {
        let payload = json!({
            "forkee": { "html_url": "https://github.com/a/b" },
            "pages": [{ "html_url": "https://github.com/a/b/wiki/Home" }],
            "matrix": [[1, 2], [3, 4]],
        });

        assert_eq!(
            lookup_str(&payload, "forkee.html_url"),
            Some("https://github.com/a/b")
        );
        assert_eq!(
            lookup_str(&payload, "pages[0].html_url"),
            Some("https://github.com/a/b/wiki/Home")
        );
        assert_eq!(lookup(&payload, "matrix[1][0]"), Some(&json!(3)));
    }

    #[test]
    fn lookup_never_fails_on_missing_segments() {
        let payload = json!({ "pages": [], "forkee": null });

        assert_eq!(lookup(&payload, "pages[0].html_url"), None);
        assert_eq!(lookup(&payload, "forkee.html_url"), None);
        assert_eq!(lookup(&payload, "team.html_url"), None);
        assert_eq!(lookup(&payload, "pages[x]"), None);
        assert_eq!(lookup(&payload, "pages[0"), None);
    }

    #[test]
    fn truthiness() {
        let payload = json!({
            "null": null,
            "false": false,
            "zero": 0,
            "empty": "",
            "obj": {},
            "arr": [],
            "one": 1,
            "text": "x",
        });

        for key in &["null", "false", "zero", "empty", "absent"] {
            assert!(!has(&payload, key), "{} should be falsy", key);
        }
        for key in &["obj", "arr", "one", "text"] {
            assert!(has(&payload, key), "{} should be truthy", key);
        }
    }

    #[test]
    fn humanize_replaces_every_underscore() {
        assert_eq!(
            humanize("pull_request_review_comment"),
            "pull request review comment"
        );
    }

    #[test]
    fn views_report_missing_objects() {
        let payload = json!({ "repository": null });

        assert_eq!(
            Repository::of(&payload),
            Err(MalformedPayload::Missing("repository"))
        );
        assert_eq!(
            User::sender(&json!({ "sender": "octocat" })),
            Err(MalformedPayload::NotObject("sender"))
        );
    }

    #[test]
    fn views_render_partial_objects_blank() {
        let payload = json!({
            "repository": {},
            "sender": { "login": "x", "html_url": 7 },
        });

        assert_eq!(Repository::of(&payload), Ok(Repository::default()));
        assert_eq!(
            User::sender(&payload),
            Ok(User {
                login: "x".into(),
                ..User::default()
            })
        );
    }
}
