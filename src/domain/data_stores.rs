use super::{
    AgeStatistics, Member, MemberAssignment, MemberFilter, MemberId,
    MemberTeamRow, NewMember, Pageable, Team, TeamAgeAverage, TeamId,
    TeamName,
};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Backing store for members and teams.
///
/// Loaded members are kept in an identity map. Bulk operations write to the
/// store directly and never touch that map, so callers must invoke
/// [`MemberStore::clear_cache`] before re-reading anything a bulk operation
/// may have changed.
#[async_trait::async_trait]
pub trait MemberStore {
    async fn add_team(
        &mut self,
        team_name: TeamName,
    ) -> Result<Team, MemberStoreError>;
    async fn add_member(
        &mut self,
        member: NewMember,
    ) -> Result<Member, MemberStoreError>;
    async fn find_team(
        &self,
        team_id: &TeamId,
    ) -> Result<Team, MemberStoreError>;
    async fn find_member(
        &mut self,
        member_id: &MemberId,
    ) -> Result<Member, MemberStoreError>;
    /// Filtered member/team rows, left-joined so members without a team are
    /// kept. Without a pageable every match is returned in member id order.
    async fn search_members(
        &self,
        filter: &MemberFilter,
        pageable: Option<&Pageable>,
    ) -> Result<Vec<MemberTeamRow>, MemberStoreError>;
    async fn count_members(
        &self,
        filter: &MemberFilter,
    ) -> Result<u64, MemberStoreError>;
    /// Applies the assignment to every matching member, or to none of them
    /// when any new value is out of range.
    async fn bulk_update(
        &mut self,
        filter: &MemberFilter,
        assignment: &MemberAssignment,
    ) -> Result<u64, MemberStoreError>;
    async fn bulk_delete(
        &mut self,
        filter: &MemberFilter,
    ) -> Result<u64, MemberStoreError>;
    async fn age_statistics(
        &self,
        filter: &MemberFilter,
    ) -> Result<AgeStatistics, MemberStoreError>;
    /// Average age per team, ordered by team name. Members without a team
    /// are not counted.
    async fn average_age_by_team(
        &self,
    ) -> Result<Vec<TeamAgeAverage>, MemberStoreError>;
    async fn clear_cache(&mut self);
}

#[derive(Debug, Error)]
pub enum MemberStoreError {
    #[error("Member not found")]
    MemberNotFound,
    #[error("Team not found")]
    TeamNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for MemberStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::MemberNotFound, Self::MemberNotFound)
                | (Self::TeamNotFound, Self::TeamNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
