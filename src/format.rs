//! Per-category formatters.
//!
//! A formatter only computes what differs between categories: the title, an
//! optional link and extra fields. Everything shared is added by
//! [`CardBuilder`](crate::card::CardBuilder).

use serde_json::Value;

use crate::{
    card::Field,
    payload::{self, humanize, lookup_str},
};

/// Category-specific part of a card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extension {
    pub title: Option<String>,
    pub link: Option<String>,
    pub fields: Vec<Field>,
    /// Leave `title_link` unset instead of pointing at the repository when
    /// `link` is `None`.
    pub no_default_link: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Formatted {
    Card(Extension),
    /// Recognized, but not worth a notification.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFormat {
    pub label: &'static str,
    /// Path passed to [`payload::lookup`].
    pub link: Option<&'static str>,
    /// Key holding the verb appended to the title.
    pub action_key: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Hook,
    Star,
    Release,
    Issue,
    PullRequest,
    Push,
    Action(ActionFormat),
    Unrecognized,
}

impl Format {
    pub const fn action(label: &'static str, link: Option<&'static str>) -> Self {
        Self::action_keyed(label, link, "action")
    }

    pub const fn action_keyed(
        label: &'static str,
        link: Option<&'static str>,
        action_key: &'static str,
    ) -> Self {
        Format::Action(ActionFormat {
            label,
            link,
            action_key,
        })
    }

    pub fn apply(self, body: &Value) -> Formatted {
        match self {
            Format::Hook => Formatted::Card(hook(body)),
            Format::Star => Formatted::Card(star(body)),
            Format::Release => release(body),
            Format::Issue => Formatted::Card(issue(body)),
            Format::PullRequest => Formatted::Card(pull_request(body)),
            Format::Push => Formatted::Card(push(body)),
            Format::Action(format) => Formatted::Card(format.apply(body)),
            Format::Unrecognized => Formatted::Card(Extension::default()),
        }
    }
}

fn text(body: &Value, path: &str) -> String {
    lookup_str(body, path).unwrap_or_default().to_owned()
}

fn markdown_link(label: &str, url: &str) -> String {
    format!("[{}]({})", label, url)
}

fn hook(body: &Value) -> Extension {
    let events = payload::lookup(body, "hook.events")
        .and_then(Value::as_array)
        .map(|events| {
            events
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    Extension {
        title: Some("New GitHub Webhook Created".into()),
        fields: vec![Field::new("Events", events)],
        ..Extension::default()
    }
}

fn star(body: &Value) -> Extension {
    let title = match lookup_str(body, "action") {
        Some("created") => Some("New Star!".into()),
        Some("deleted") => Some("Lost a star".into()),
        _ => None,
    };
    Extension {
        title,
        ..Extension::default()
    }
}

fn release(body: &Value) -> Formatted {
    let action = match lookup_str(body, "action") {
        Some(action @ "published") => action,
        _ => return Formatted::Skip,
    };
    let description = lookup_str(body, "release.body")
        .filter(|b| !b.is_empty())
        .unwrap_or("No description");

    Formatted::Card(Extension {
        title: Some(format!("Release {}", humanize(action))),
        link: link(body, "release.html_url"),
        fields: vec![Field::new("Release", description)],
        ..Extension::default()
    })
}

fn is_pull_url(url: &str) -> bool {
    let mut segments = url.rsplit('/');
    let number = segments.next().unwrap_or_default();
    !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && segments.next() == Some("pull")
}

fn link(body: &Value, path: &str) -> Option<String> {
    lookup_str(body, path)
        .filter(|url| !url.is_empty())
        .map(Into::into)
}

/// Appends a body field when the `key` sub-object is present.
///
/// Returns `None` when it is absent, otherwise the sub-object's own link.
fn annotate(
    body: &Value,
    key: &str,
    field_title: &str,
    fields: &mut Vec<Field>,
) -> Option<Option<String>> {
    if !payload::has(body, key) {
        return None;
    }
    let content = text(body, &format!("{}.body", key));
    if !content.is_empty() {
        fields.push(Field::new(field_title, content));
    }
    Some(link(body, &format!("{}.html_url", key)))
}

fn action_text(body: &Value) -> String {
    humanize(lookup_str(body, "action").unwrap_or_default())
}

fn issue(body: &Value) -> Extension {
    let url = link(body, "issue.html_url");
    let noun = if url.as_deref().map_or(false, is_pull_url) {
        "Pull request"
    } else {
        "Issue"
    };
    let mut fields = vec![Field::new(
        noun,
        markdown_link(&text(body, "issue.title"), url.as_deref().unwrap_or_default()),
    )];

    let (suffix, link) = match annotate(body, "comment", "Comment body", &mut fields) {
        Some(comment) => (" comment", comment.or(url)),
        None => ("", url),
    };

    Extension {
        title: Some(format!("{}{} {}", noun, suffix, action_text(body))),
        link,
        fields,
        ..Extension::default()
    }
}

fn pull_request(body: &Value) -> Extension {
    let url = link(body, "pull_request.html_url");
    let mut fields = vec![Field::new(
        "Pull request",
        markdown_link(
            &text(body, "pull_request.title"),
            url.as_deref().unwrap_or_default(),
        ),
    )];

    let (suffix, link) =
        if let Some(review) = annotate(body, "review", "Review body", &mut fields) {
            (" review", review.or(url))
        } else if let Some(comment) = annotate(body, "comment", "Comment body", &mut fields) {
            (" comment", comment.or(url))
        } else {
            ("", url)
        };

    Extension {
        title: Some(format!("Pull Request{} {}", suffix, action_text(body))),
        link,
        fields,
        ..Extension::default()
    }
}

fn push(body: &Value) -> Extension {
    let fields = body
        .get("commits")
        .and_then(Value::as_array)
        .map(|commits| {
            commits
                .iter()
                .map(|commit| {
                    Field::new(
                        "Commit",
                        markdown_link(&text(commit, "message"), &text(commit, "url")),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    Extension {
        title: Some("New Push event".into()),
        link: link(body, "compare"),
        fields,
        ..Extension::default()
    }
}

impl ActionFormat {
    pub fn apply(&self, body: &Value) -> Extension {
        let verb = lookup_str(body, self.action_key)
            .filter(|verb| !verb.is_empty())
            .map(|verb| format!(" {}", humanize(verb)))
            .unwrap_or_default();

        Extension {
            title: Some(format!("New event: {}{}", self.label, verb)),
            link: self.link.and_then(|path| link(body, path)),
            fields: Vec::new(),
            no_default_link: true,
        }
    }
}
