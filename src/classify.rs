//! Shape classification of GitHub deliveries.
//!
//! GitHub sends the event name only in the `X-GitHub-Event` header, so the
//! category is inferred from which keys the body carries. The tests are not
//! mutually exclusive: [`RULES`] is evaluated top to bottom and the first
//! match wins.

use serde_json::Value;

use crate::{format::Format, payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    HookCreated,
    Star,
    Release,
    Issue,
    PullRequest,
    Push,
    CheckRun,
    CheckSuite,
    Alert,
    ContentReference,
    BranchOrTagCreated,
    BranchOrTagDeleted,
    DeployKey,
    DeploymentStatus,
    Deployment,
    ForkCreated,
    WikiUpdated,
    Label,
    Member,
    Milestone,
    Package,
    PageBuild,
    ProjectCard,
    Project,
    TeamAdded,
    ProjectColumn,
    CommitStatus,
    RepositoryEvent,
    RepositoryImport,
    Fallback,
}

/// Structural test applied to a payload.
#[derive(Debug, Clone, Copy)]
pub enum Test {
    /// Key is present and truthy.
    Has(&'static str),
    /// Every key is present and truthy.
    HasAll(&'static [&'static str]),
    /// First key is truthy and the second is not.
    HasWithout(&'static str, &'static str),
    /// Top-level keys are exactly this set.
    KeysEqual(&'static [&'static str]),
    Always,
}

impl Test {
    pub fn matches(self, payload: &Value) -> bool {
        match self {
            Test::Has(key) => payload::has(payload, key),
            Test::HasAll(keys) => keys.iter().all(|key| payload::has(payload, key)),
            Test::HasWithout(key, absent) => {
                payload::has(payload, key) && !payload::has(payload, absent)
            }
            Test::KeysEqual(keys) => match payload.as_object() {
                Some(object) => {
                    object.len() == keys.len() && keys.iter().all(|k| object.contains_key(*k))
                }
                None => false,
            },
            Test::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub test: Test,
    pub category: EventCategory,
    pub format: Format,
}

const REPOSITORY_EVENT_KEYS: &[&str] = &[
    "action",
    "repository",
    "organization",
    "installation",
    "sender",
];

const fn rule(test: Test, category: EventCategory, format: Format) -> Rule {
    Rule {
        test,
        category,
        format,
    }
}

const fn action(
    key: &'static str,
    category: EventCategory,
    label: &'static str,
    link: Option<&'static str>,
) -> Rule {
    rule(Test::Has(key), category, Format::action(label, link))
}

use EventCategory as C;

/// Evaluated in order; the trailing [`Test::Always`] makes classification total.
pub static RULES: &[Rule] = &[
    rule(Test::Has("hook"), C::HookCreated, Format::Hook),
    rule(Test::Has("starred_at"), C::Star, Format::Star),
    rule(Test::Has("release"), C::Release, Format::Release),
    rule(Test::Has("issue"), C::Issue, Format::Issue),
    rule(Test::Has("pull_request"), C::PullRequest, Format::PullRequest),
    rule(Test::Has("commits"), C::Push, Format::Push),
    action("check_run", C::CheckRun, "Check run", None),
    action("check_suite", C::CheckSuite, "Check suite", None),
    action("alert", C::Alert, "Alert", None),
    action("content_reference", C::ContentReference, "Content reference", None),
    // Must precede the bare `ref` test: creation payloads carry both keys.
    rule(
        Test::HasAll(&["master_branch", "ref"]),
        C::BranchOrTagCreated,
        Format::action("A Git branch or tag created", None),
    ),
    action("ref", C::BranchOrTagDeleted, "A Git branch or tag deleted", None),
    action("key", C::DeployKey, "Deploy key", None),
    action("deployment_status", C::DeploymentStatus, "Deployment Status", None),
    action("deployment", C::Deployment, "Deployment", None),
    action("forkee", C::ForkCreated, "Fork created", Some("forkee.html_url")),
    action("pages", C::WikiUpdated, "Wiki created or updated", Some("pages[0].html_url")),
    action("label", C::Label, "Label", None),
    action("member", C::Member, "Member", None),
    action("milestone", C::Milestone, "Milestone", None),
    action("package", C::Package, "Package", None),
    action("build", C::PageBuild, "Page build", None),
    action("project_card", C::ProjectCard, "Project card", None),
    action("project", C::Project, "Project", Some("project.html_url")),
    action("team", C::TeamAdded, "Team Added", Some("team.html_url")),
    action("project_column", C::ProjectColumn, "Project column", None),
    rule(
        Test::Has("state"),
        C::CommitStatus,
        Format::action_keyed("Status of a Git commit changes", Some("commit.html_url"), "state"),
    ),
    // Unreachable: `package` is already claimed above. Kept until it is
    // decided whether the link was meant for the first `package` rule.
    action("package", C::Package, "Package", Some("package.html_url")),
    rule(
        Test::KeysEqual(REPOSITORY_EVENT_KEYS),
        C::RepositoryEvent,
        Format::action("Repository", None),
    ),
    rule(
        Test::HasWithout("status", "installation"),
        C::RepositoryImport,
        Format::action_keyed("Repository import", None, "status"),
    ),
    rule(Test::Always, C::Fallback, Format::Unrecognized),
];

/// First rule matching `payload`.
pub fn matching_rule(payload: &Value) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| rule.test.matches(payload))
        .unwrap_or(&FALLBACK)
}

static FALLBACK: Rule = rule(Test::Always, C::Fallback, Format::Unrecognized);

#[allow(dead_code)]
pub fn classify(payload: &Value) -> EventCategory {
    matching_rule(payload).category
}
