use chrono::{DateTime, Utc};

/// How an account authenticates against the Linear API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinearAuth {
    ApiKey { key: String },
    OAuth { token: String },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinearAccount {
    pub name: String,
    pub auth: LinearAuth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

/// Filters that narrow the set of issues pulled for a user's board.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeFilter {
    #[serde(default)]
    pub assigned_to_me: bool,
    #[serde(default)]
    pub include_projects: Vec<String>,
    #[serde(default)]
    pub exclude_projects: Vec<String>,
    #[serde(default)]
    pub include_teams: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_updated_within_days")]
    pub updated_within_days: u32,
}

fn default_updated_within_days() -> u32 {
    30
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self {
            assigned_to_me: false,
            include_projects: Vec::new(),
            exclude_projects: Vec::new(),
            include_teams: Vec::new(),
            labels: Vec::new(),
            updated_within_days: default_updated_within_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinearTeam {
    pub id: String,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueState {
    pub id: String,
    pub name: String,
    /// Linear's workflow state type: `backlog | unstarted | started |
    /// review | completed | canceled`.
    #[serde(rename = "type")]
    pub state_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueAssignee {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueProject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub priority: f64,
    pub state: IssueState,
    pub team: LinearTeam,
    #[serde(default)]
    pub project: Option<IssueProject>,
    #[serde(default)]
    pub assignee: Option<IssueAssignee>,
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Which configured account this issue came from; stamped by the
    /// service, not part of Linear's own payload.
    #[serde(default)]
    pub account: String,
}

/// Accepts either a plain array of names (our own cache's on-disk shape,
/// produced by this struct's own `Serialize` impl) or Linear's GraphQL
/// label connection (`{"nodes":[{"name":"bug"}]}`).
fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LabelsShape {
        Connection { nodes: Vec<LabelNode> },
        Flat(Vec<String>),
    }
    #[derive(Deserialize)]
    struct LabelNode {
        name: String,
    }

    match LabelsShape::deserialize(deserializer)? {
        LabelsShape::Connection { nodes } => Ok(nodes.into_iter().map(|node| node.name).collect()),
        LabelsShape::Flat(names) => Ok(names),
    }
}
