use serde::Serialize;

use crate::{
    format::Extension,
    payload::{Repository, User},
};

pub const COLOR: &str = "#00ff2a";
pub const FEEDBACK_URL: &str = "https://github.com/ringcentral/github-notification-app/issues/new";
const FEEDBACK_LABEL: &str =
    "Feedback (Any suggestions, or issues about the github notification app?)";
pub const DEFAULT_TITLE: &str = "New event!";
pub const UNSUPPORTED_TEXT: &str =
    "It is a event the Github Integration do not fully support, we will improve in future updates.";

// Keep unused variants for documentation
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Style {
    Short,
    Long,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub style: Style,
}

impl Field {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            style: Style::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttachmentType {
    Card,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentType,
    pub color: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    pub text: String,
    pub author_name: String,
    pub author_link: String,
    pub author_icon: String,
    pub footer: String,
    pub fields: Vec<Field>,
}

/// Body relayed to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationCard {
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
impl NotificationCard {
    pub fn attachment(&self) -> &Attachment {
        &self.attachments[0]
    }
}

/// Assembles a [`NotificationCard`].
///
/// The author block, footer and leading `Repository` field always come from
/// the builder. An [`Extension`] may replace the title and link and append
/// fields, nothing else. Without an extension title the card gets
/// [`DEFAULT_TITLE`] and the top-level [`UNSUPPORTED_TEXT`]. Without an
/// extension link `title_link` points at the repository, unless the extension
/// sets `no_default_link`.
#[derive(Debug, Clone)]
pub struct CardBuilder {
    repository: Repository,
    sender: User,
    extension: Extension,
}

impl CardBuilder {
    pub fn new(repository: Repository, sender: User) -> Self {
        Self {
            repository,
            sender,
            extension: Extension::default(),
        }
    }

    pub fn extension(mut self, extension: Extension) -> Self {
        self.extension = extension;
        self
    }

    pub fn build(self) -> NotificationCard {
        let Self {
            repository,
            sender,
            extension:
                Extension {
                    title,
                    link,
                    fields: extra,
                    no_default_link,
                },
        } = self;

        let text = match &title {
            Some(_) => None,
            None => Some(UNSUPPORTED_TEXT.to_owned()),
        };
        let text_url = link.clone().unwrap_or_else(|| repository.html_url.clone());
        let title_link = match &link {
            Some(_) => link.clone(),
            None if no_default_link => None,
            None => Some(repository.html_url.clone()),
        };

        let mut fields = Vec::with_capacity(extra.len() + 1);
        fields.push(Field::new(
            "Repository",
            format!("[{}]({})", repository.full_name, repository.html_url),
        ));
        fields.extend(extra.into_iter().map(|field| Field {
            style: Style::Short,
            ..field
        }));

        NotificationCard {
            attachments: vec![Attachment {
                kind: AttachmentType::Card,
                color: COLOR,
                title: title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
                fallback: link,
                title_link,
                text: text_url,
                author_name: sender.login,
                author_link: sender.html_url,
                author_icon: sender.avatar_url,
                footer: format!("[{}]({})", FEEDBACK_LABEL, FEEDBACK_URL),
                fields,
            }],
            text,
        }
    }
}
