use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::json;
use tracing::{info, warn};

use amux_config::LinearConfig;
use amux_paths::Paths;
use amux_protocol::{Issue, IssueState, LinearAccount, LinearAuth, ScopeFilter};

use crate::cache;
use crate::client::Client;
use crate::errors::LinearError;

const KEYRING_SERVICE: &str = "amux.linear";
const PAGE_SIZE: u32 = 50;

/// Orchestrates one-or-many Linear accounts sharing a service-wide config.
///
/// Per-account state (`Client`, viewer id, team states, back-off) lives
/// behind a single mutex; callers that fan out across threads must
/// serialize their own calls into this service.
pub struct Service {
    paths: Paths,
    config: LinearConfig,
    state: Mutex<HashMap<String, AccountState>>,
}

#[derive(Default)]
struct AccountState {
    viewer_id: Option<String>,
    teams: HashMap<String, CachedTeam>,
    backoff: Option<DateTime<Utc>>,
}

struct CachedTeam {
    states: Vec<IssueState>,
}

impl Service {
    pub fn new(paths: Paths, config: LinearConfig) -> Self {
        Self { paths, config, state: Mutex::new(HashMap::new()) }
    }

    /// Configured accounts filtered by the active-accounts subset.
    pub fn active_accounts(&self) -> Vec<&LinearAccount> {
        self.config.active_accounts()
    }

    /// Resolve `(token, token_type)` for an account: API keys are used as
    /// the raw token; OAuth accounts use the in-config access token,
    /// falling back to an OS-keychain lookup when that is empty.
    pub fn account_token(&self, account: &LinearAccount) -> Result<(String, String), LinearError> {
        match &account.auth {
            LinearAuth::ApiKey { key } => Ok((key.clone(), String::new())),
            LinearAuth::OAuth { token } => {
                if !token.is_empty() {
                    return Ok((token.clone(), "Bearer".to_string()));
                }
                keyring_lookup(&account.name)
                    .map(|token| (token, "Bearer".to_string()))
                    .ok_or_else(|| LinearError::AuthMissing(account.name.clone()))
            }
        }
    }

    fn client_for(&self, account: &LinearAccount) -> Result<Client, LinearError> {
        let (token, token_type) = self.account_token(account)?;
        Ok(Client::new(token, token_type))
    }

    /// Active accounts whose token cannot currently be resolved (empty
    /// OAuth access token with no keychain fallback, or any other
    /// `account_token` failure).
    pub fn missing_auth_accounts(&self) -> Vec<&LinearAccount> {
        self.active_accounts()
            .into_iter()
            .filter(|account| self.account_token(account).is_err())
            .collect()
    }

    /// Refresh every active account with a usable token, accumulating
    /// issues across accounts. Accounts currently in back-off are skipped
    /// with a warning rather than aborting the whole refresh.
    pub fn refresh_my_issues(&self) -> Result<Vec<Issue>, LinearError> {
        let mut all = Vec::new();
        for account in self.active_accounts() {
            let (token, _) = match self.account_token(account) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(event = "linear.service.account_skipped", account = %account.name, error = %e);
                    continue;
                }
            };
            if token.is_empty() {
                continue;
            }

            let now = Utc::now();
            {
                let state = self.state.lock().expect("linear service state mutex poisoned");
                if let Some(until) = state.get(&account.name).and_then(|s| s.backoff)
                    && now < until
                {
                    return Err(LinearError::BackoffActive { account: account.name.clone(), until });
                }
            }

            match self.fetch_account_issues(account) {
                Ok(issues) => all.extend(issues),
                Err(e) => return Err(e),
            }
        }
        Ok(all)
    }

    /// Disk-cached issues for `account`, keyed by its cached viewer id.
    /// Empty when the account has never been fetched.
    pub fn cached_issues(&self, account: &str) -> Result<Vec<Issue>, LinearError> {
        let viewer_id = {
            let state = self.state.lock().expect("linear service state mutex poisoned");
            state.get(account).and_then(|s| s.viewer_id.clone())
        };
        match viewer_id {
            Some(viewer_id) => cache::load(&self.paths, account, &viewer_id),
            None => Ok(Vec::new()),
        }
    }

    /// Team workflow states for `team`, fetched once and cached for the
    /// lifetime of the service.
    pub fn team_states(&self, account: &LinearAccount, team_id: &str) -> Result<Vec<IssueState>, LinearError> {
        {
            let state = self.state.lock().expect("linear service state mutex poisoned");
            if let Some(team) = state.get(&account.name).and_then(|s| s.teams.get(team_id)) {
                return Ok(team.states.clone());
            }
        }

        let http = self.client_for(account)?.with_actor(account.name.clone());

        #[derive(serde::Deserialize)]
        struct TeamData {
            team: TeamStatesNode,
        }
        #[derive(serde::Deserialize)]
        struct TeamStatesNode {
            states: StatesConnection,
        }
        #[derive(serde::Deserialize)]
        struct StatesConnection {
            nodes: Vec<IssueState>,
        }

        const QUERY: &str =
            "query($id: String!) { team(id: $id) { states { nodes { id name type } } } }";
        let data: TeamData = http.do_query(QUERY, json!({ "id": team_id }))?;

        let mut state = self.state.lock().expect("linear service state mutex poisoned");
        state
            .entry(account.name.clone())
            .or_default()
            .teams
            .insert(team_id.to_string(), CachedTeam { states: data.team.states.nodes.clone() });
        Ok(data.team.states.nodes)
    }

    fn viewer_id(&self, account: &LinearAccount, http: &Client) -> Result<String, LinearError> {
        {
            let state = self.state.lock().expect("linear service state mutex poisoned");
            if let Some(id) = state.get(&account.name).and_then(|s| s.viewer_id.clone()) {
                return Ok(id);
            }
        }

        #[derive(serde::Deserialize)]
        struct ViewerData {
            viewer: Viewer,
        }
        #[derive(serde::Deserialize)]
        struct Viewer {
            id: String,
        }

        let data: ViewerData = http.do_query("query { viewer { id } }", json!({}))?;
        let mut state = self.state.lock().expect("linear service state mutex poisoned");
        state.entry(account.name.clone()).or_default().viewer_id = Some(data.viewer.id.clone());
        Ok(data.viewer.id)
    }

    /// Fetch all pages of issues for one account, tag them with the
    /// account name, and persist to disk cache on success.
    pub fn fetch_account_issues(&self, account: &LinearAccount) -> Result<Vec<Issue>, LinearError> {
        let http = self.client_for(account)?.with_actor(account.name.clone());
        let viewer_id = self.viewer_id(account, &http)?;

        let mut filter = json!({ "archived": { "eq": false } });
        if self.config.scope.assigned_to_me {
            filter["assignee"] = json!({ "id": { "eq": viewer_id } });
        }

        #[derive(serde::Deserialize)]
        struct IssuesData {
            issues: IssueConnection,
        }
        #[derive(serde::Deserialize)]
        struct IssueConnection {
            nodes: Vec<Issue>,
            #[serde(rename = "pageInfo")]
            page_info: PageInfo,
        }
        #[derive(serde::Deserialize)]
        struct PageInfo {
            #[serde(rename = "hasNextPage")]
            has_next_page: bool,
            #[serde(rename = "endCursor")]
            end_cursor: Option<String>,
        }

        const QUERY: &str = "query($first: Int!, $after: String, $filter: IssueFilter) { \
            issues(first: $first, after: $after, filter: $filter, orderBy: updatedAt) { \
            nodes { id identifier title description url priority state { id name type } \
            team { id key name } project { id name } assignee { id name } labels { nodes { name } } \
            createdAt updatedAt } pageInfo { hasNextPage endCursor } } }";

        let mut collected = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let variables = json!({ "first": PAGE_SIZE, "after": after, "filter": filter });
            let result: Result<IssuesData, LinearError> = http.do_query(QUERY, variables);
            let page = match result {
                Ok(page) => page,
                Err(LinearError::RateLimited { reset, status, body }) => {
                    let mut state = self.state.lock().expect("linear service state mutex poisoned");
                    state.entry(account.name.clone()).or_default().backoff = Some(reset);
                    return Err(LinearError::RateLimited { reset, status, body });
                }
                Err(e) => return Err(e),
            };

            for mut issue in page.issues.nodes {
                issue.account = account.name.clone();
                collected.push(issue);
            }

            if !page.issues.page_info.has_next_page {
                break;
            }
            after = page.issues.page_info.end_cursor;
        }

        cache::save(&self.paths, &account.name, &viewer_id, &collected)?;

        let mut state = self.state.lock().expect("linear service state mutex poisoned");
        state.entry(account.name.clone()).or_default().backoff = None;
        info!(event = "linear.service.fetch_completed", account = %account.name, count = collected.len());

        Ok(collected)
    }

    /// Filter `issues` by `scope`'s project/team/label/recency rules.
    pub fn apply_scope_filters(&self, issues: Vec<Issue>, scope: &ScopeFilter) -> Vec<Issue> {
        let cutoff = (scope.updated_within_days > 0)
            .then(|| Utc::now() - ChronoDuration::days(scope.updated_within_days as i64));

        issues
            .into_iter()
            .filter(|issue| {
                if let Some(project) = &issue.project
                    && scope.exclude_projects.contains(&project.name)
                {
                    return false;
                }
                if !scope.include_projects.is_empty() {
                    let in_set = issue
                        .project
                        .as_ref()
                        .map(|p| scope.include_projects.contains(&p.name))
                        .unwrap_or(false);
                    if !in_set {
                        return false;
                    }
                }
                if !scope.include_teams.is_empty() && !scope.include_teams.contains(&issue.team.name) {
                    return false;
                }
                if let Some(cutoff) = cutoff
                    && issue.updated_at < cutoff
                {
                    return false;
                }
                if !scope.labels.is_empty() {
                    let matches = issue
                        .labels
                        .iter()
                        .any(|label| scope.labels.iter().any(|want| want.eq_ignore_ascii_case(label)));
                    if !matches {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Stable sort by `updated_at` descending.
    pub fn sort_issues(&self, mut issues: Vec<Issue>) -> Vec<Issue> {
        issues.sort_by_key(|issue| std::cmp::Reverse(issue.updated_at));
        issues
    }
}

fn keyring_lookup(account: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, account).ok()?.get_password().ok()
}
