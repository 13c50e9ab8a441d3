use serde_json::Value;

use crate::{
    card::{CardBuilder, NotificationCard},
    classify::{self, Rule},
    format::Formatted,
    payload::{MalformedPayload, Repository, User},
};

/// Turns a delivery into a card.
///
/// `Ok(None)` means the event is recognized but not notifiable and the
/// delivery should be skipped. Unrecognized events still produce a card.
pub fn transform(payload: &Value) -> Result<Option<NotificationCard>, MalformedPayload> {
    render(classify::matching_rule(payload), payload)
}

/// [`transform`] for a payload already matched against [`classify::RULES`].
pub fn render(rule: &Rule, payload: &Value) -> Result<Option<NotificationCard>, MalformedPayload> {
    tracing::debug!(category = ?rule.category, "Rendering delivery");

    let extension = match rule.format.apply(payload) {
        Formatted::Card(extension) => extension,
        Formatted::Skip => return Ok(None),
    };

    let card = CardBuilder::new(Repository::of(payload)?, User::sender(payload)?)
        .extension(extension)
        .build();
    Ok(Some(card))
}
