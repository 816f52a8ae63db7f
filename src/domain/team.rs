use super::{TeamId, TeamName};

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub team_id: TeamId,
    pub team_name: TeamName,
}

impl Team {
    pub fn new(team_id: TeamId, team_name: TeamName) -> Self {
        Self { team_id, team_name }
    }
}
