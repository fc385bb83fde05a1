use amux_protocol::{BoardConfig, IssueState, LinearTeam, StateMapping};

/// Deterministic column assignment from an issue's workflow state, the
/// state's team, and the board's configuration. A pure function of its
/// three arguments.
pub fn map_state_to_column(state: &IssueState, team: &LinearTeam, board: &BoardConfig) -> String {
    if let StateMapping::Custom(Some(overrides)) = &board.state_mapping {
        for outer_key in [team.name.as_str(), team.key.as_str(), team.id.as_str()] {
            if let Some(inner) = overrides.get(outer_key)
                && let Some(column) = inner.get(state.name.as_str())
            {
                return column.clone();
            }
        }
    }

    match state.state_type.to_ascii_lowercase().as_str() {
        "backlog" | "unstarted" => "Todo",
        "started" => "In Progress",
        "review" => "In Review",
        "completed" | "canceled" => "Done",
        _ => "Todo",
    }
    .to_string()
}

/// Case-insensitive index of `name` within `columns`.
pub fn column_index(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn team() -> LinearTeam {
        LinearTeam { id: "team-id".into(), key: "ENG".into(), name: "Engineering".into() }
    }

    fn state(name: &str, state_type: &str) -> IssueState {
        IssueState { id: "s1".into(), name: name.into(), state_type: state_type.into() }
    }

    #[test]
    fn test_auto_mapping_by_state_type() {
        let board = BoardConfig::default();
        assert_eq!(map_state_to_column(&state("Backlog", "backlog"), &team(), &board), "Todo");
        assert_eq!(map_state_to_column(&state("In Dev", "started"), &team(), &board), "In Progress");
        assert_eq!(map_state_to_column(&state("In Review", "review"), &team(), &board), "In Review");
        assert_eq!(map_state_to_column(&state("Done", "completed"), &team(), &board), "Done");
        assert_eq!(map_state_to_column(&state("Canceled", "canceled"), &team(), &board), "Done");
        assert_eq!(map_state_to_column(&state("Weird", "mystery"), &team(), &board), "Todo");
    }

    #[test]
    fn test_auto_mapping_is_case_insensitive_on_state_type() {
        let board = BoardConfig::default();
        assert_eq!(map_state_to_column(&state("Started", "STARTED"), &team(), &board), "In Progress");
    }

    #[test]
    fn test_custom_mapping_tries_team_name_then_key_then_id() {
        let mut overrides = HashMap::new();
        let mut inner = HashMap::new();
        inner.insert("Done".to_string(), "Shipped".to_string());
        overrides.insert("Engineering".to_string(), inner);

        let mut board = BoardConfig::default();
        board.state_mapping = amux_protocol::StateMapping::Custom(Some(overrides));

        assert_eq!(map_state_to_column(&state("Done", "completed"), &team(), &board), "Shipped");
    }

    #[test]
    fn test_custom_mapping_falls_through_to_auto_when_no_override_matches() {
        let mut overrides = HashMap::new();
        overrides.insert("OtherTeam".to_string(), HashMap::new());
        let mut board = BoardConfig::default();
        board.state_mapping = amux_protocol::StateMapping::Custom(Some(overrides));

        assert_eq!(map_state_to_column(&state("Done", "completed"), &team(), &board), "Done");
    }

    #[test]
    fn test_column_index_case_insensitive_and_absent() {
        let columns = vec!["Todo".to_string(), "In Progress".to_string()];
        assert_eq!(column_index(&columns, "todo"), Some(0));
        assert_eq!(column_index(&columns, "IN PROGRESS"), Some(1));
        assert_eq!(column_index(&columns, "Done"), None);
    }
}
