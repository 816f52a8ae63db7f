use super::{MemberId, TeamId, Username};

/// A member as stored. The team link is a plain foreign key; teams hold no
/// reference back to their members.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub member_id: MemberId,
    pub username: Option<Username>,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

/// A member that has not been persisted yet. The store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub username: Option<Username>,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    pub fn new(
        username: Option<Username>,
        age: i32,
        team_id: Option<TeamId>,
    ) -> Self {
        Self {
            username,
            age,
            team_id,
        }
    }

    pub fn into_member(self, member_id: MemberId) -> Member {
        Member {
            member_id,
            username: self.username,
            age: self.age,
            team_id: self.team_id,
        }
    }
}
