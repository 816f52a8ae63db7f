use std::collections::{BTreeMap, HashMap};

use color_eyre::eyre::eyre;

use crate::domain::{
    AgeSnapshot, AgeStatistics, Member, MemberAssignment, MemberFilter,
    MemberId, MemberStore, MemberStoreError, MemberTeamRow, NewMember,
    Pageable, Team, TeamAgeAverage, TeamId, TeamName,
};

#[derive(Default)]
pub struct HashmapMemberStore {
    teams: BTreeMap<TeamId, Team>,
    members: BTreeMap<MemberId, Member>,
    identity_map: HashMap<MemberId, Member>,
    last_team_id: i64,
    last_member_id: i64,
}

impl HashmapMemberStore {
    fn team_of(&self, member: &Member) -> Option<&Team> {
        member.team_id.as_ref().and_then(|id| self.teams.get(id))
    }

    fn matching<'a>(
        &'a self,
        filter: &'a MemberFilter,
    ) -> impl Iterator<Item = &'a Member> + 'a {
        let ages = if filter.needs_age_snapshot() {
            AgeSnapshot::from_ages(self.members.values().map(|m| m.age))
        } else {
            AgeSnapshot::default()
        };
        self.members.values().filter(move |member| {
            filter.matches(member, self.team_of(member), &ages)
        })
    }

    fn matching_ids(&self, filter: &MemberFilter) -> Vec<MemberId> {
        self.matching(filter).map(|member| member.member_id).collect()
    }
}

#[async_trait::async_trait]
impl MemberStore for HashmapMemberStore {
    async fn add_team(
        &mut self,
        team_name: TeamName,
    ) -> Result<Team, MemberStoreError> {
        self.last_team_id += 1;
        let team = Team::new(TeamId::new(self.last_team_id), team_name);
        self.teams.insert(team.team_id, team.clone());
        Ok(team)
    }

    async fn add_member(
        &mut self,
        member: NewMember,
    ) -> Result<Member, MemberStoreError> {
        if let Some(team_id) = &member.team_id {
            if !self.teams.contains_key(team_id) {
                return Err(MemberStoreError::TeamNotFound);
            }
        }

        self.last_member_id += 1;
        let member = member.into_member(MemberId::new(self.last_member_id));
        self.members.insert(member.member_id, member.clone());
        Ok(member)
    }

    async fn find_team(
        &self,
        team_id: &TeamId,
    ) -> Result<Team, MemberStoreError> {
        self.teams
            .get(team_id)
            .cloned()
            .ok_or(MemberStoreError::TeamNotFound)
    }

    async fn find_member(
        &mut self,
        member_id: &MemberId,
    ) -> Result<Member, MemberStoreError> {
        if let Some(member) = self.identity_map.get(member_id) {
            return Ok(member.clone());
        }

        let member = self
            .members
            .get(member_id)
            .cloned()
            .ok_or(MemberStoreError::MemberNotFound)?;
        self.identity_map.insert(*member_id, member.clone());
        Ok(member)
    }

    async fn search_members(
        &self,
        filter: &MemberFilter,
        pageable: Option<&Pageable>,
    ) -> Result<Vec<MemberTeamRow>, MemberStoreError> {
        let mut rows: Vec<MemberTeamRow> = self
            .matching(filter)
            .map(|member| MemberTeamRow::join(member, self.team_of(member)))
            .collect();

        let Some(pageable) = pageable else {
            return Ok(rows);
        };

        rows.sort_by(|a, b| pageable.compare(a, b));
        let offset = usize::try_from(pageable.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pageable.limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_members(
        &self,
        filter: &MemberFilter,
    ) -> Result<u64, MemberStoreError> {
        Ok(self.matching(filter).count() as u64)
    }

    async fn bulk_update(
        &mut self,
        filter: &MemberFilter,
        assignment: &MemberAssignment,
    ) -> Result<u64, MemberStoreError> {
        // Nothing is written unless every matching member accepts the update.
        let updated = self
            .matching(filter)
            .map(|member| assignment.apply(member))
            .collect::<Result<Vec<Member>, _>>()
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        let count = updated.len() as u64;
        for member in updated {
            self.members.insert(member.member_id, member);
        }
        Ok(count)
    }

    async fn bulk_delete(
        &mut self,
        filter: &MemberFilter,
    ) -> Result<u64, MemberStoreError> {
        let ids = self.matching_ids(filter);
        for id in &ids {
            self.members.remove(id);
        }
        Ok(ids.len() as u64)
    }

    async fn age_statistics(
        &self,
        filter: &MemberFilter,
    ) -> Result<AgeStatistics, MemberStoreError> {
        Ok(AgeStatistics::from_ages(
            self.matching(filter).map(|member| member.age),
        ))
    }

    async fn average_age_by_team(
        &self,
    ) -> Result<Vec<TeamAgeAverage>, MemberStoreError> {
        let mut ages_by_team: BTreeMap<&str, Vec<i32>> = BTreeMap::new();
        for member in self.members.values() {
            if let Some(team) = self.team_of(member) {
                ages_by_team
                    .entry(team.team_name.as_ref())
                    .or_default()
                    .push(member.age);
            }
        }

        Ok(ages_by_team
            .into_iter()
            .filter_map(|(team_name, ages)| {
                AgeStatistics::from_ages(ages).avg.map(|average_age| {
                    TeamAgeAverage {
                        team_name: team_name.to_owned(),
                        average_age,
                    }
                })
            })
            .collect())
    }

    async fn clear_cache(&mut self) {
        self.identity_map.clear();
    }
}
