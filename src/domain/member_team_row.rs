use serde::{Deserialize, Serialize};

use super::{Member, Team};

/// Flattened member/team projection produced at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberTeamRow {
    #[serde(rename = "memberId")]
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    #[serde(rename = "teamId")]
    pub team_id: Option<i64>,
    #[serde(rename = "teamName")]
    pub team_name: Option<String>,
}

impl MemberTeamRow {
    /// Team fields are filled only when a team is supplied.
    pub fn join(member: &Member, team: Option<&Team>) -> Self {
        Self {
            member_id: *member.member_id.as_ref(),
            username: member.username.as_ref().map(|u| u.as_ref().to_owned()),
            age: member.age,
            team_id: team.map(|t| *t.team_id.as_ref()),
            team_name: team.map(|t| t.team_name.as_ref().to_owned()),
        }
    }
}
