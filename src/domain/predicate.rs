use super::{Member, MemberSearchCondition, Team};

/// A single narrowing constraint on a joined member/team pair.
///
/// The `*Max`, `*Avg` and `AgeInAgesGt` variants compare against the whole
/// member table, the way a correlated-free subquery would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberPredicate {
    UsernameEq(String),
    TeamNameEq(String),
    AgeEq(i32),
    AgeGoe(i32),
    AgeLoe(i32),
    AgeGt(i32),
    AgeLt(i32),
    /// Age equals the oldest member's age.
    AgeEqMax,
    /// Age is at least the average age.
    AgeGoeAvg,
    /// Age is one of the ages above the given bound.
    AgeInAgesGt(i32),
}

impl MemberPredicate {
    pub fn matches(
        &self,
        member: &Member,
        team: Option<&Team>,
        ages: &AgeSnapshot,
    ) -> bool {
        match self {
            Self::UsernameEq(username) => member
                .username
                .as_ref()
                .is_some_and(|u| u.as_ref() == username),
            Self::TeamNameEq(name) => {
                team.is_some_and(|t| t.team_name.as_ref() == name)
            }
            Self::AgeEq(age) => member.age == *age,
            Self::AgeGoe(age) => member.age >= *age,
            Self::AgeLoe(age) => member.age <= *age,
            Self::AgeGt(age) => member.age > *age,
            Self::AgeLt(age) => member.age < *age,
            Self::AgeEqMax => ages.max == Some(member.age),
            Self::AgeGoeAvg => {
                ages.avg.is_some_and(|avg| f64::from(member.age) >= avg)
            }
            Self::AgeInAgesGt(bound) => {
                member.age > *bound
                    && ages.ages.binary_search(&member.age).is_ok()
            }
        }
    }

    pub fn needs_age_snapshot(&self) -> bool {
        matches!(self, Self::AgeEqMax | Self::AgeGoeAvg | Self::AgeInAgesGt(_))
    }
}

/// Ages of every stored member, taken before a filter is evaluated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeSnapshot {
    ages: Vec<i32>,
    max: Option<i32>,
    avg: Option<f64>,
}

impl AgeSnapshot {
    pub fn from_ages(ages: impl IntoIterator<Item = i32>) -> Self {
        let mut ages: Vec<i32> = ages.into_iter().collect();
        ages.sort_unstable();
        let sum: i64 = ages.iter().map(|age| i64::from(*age)).sum();
        Self {
            max: ages.last().copied(),
            avg: (!ages.is_empty()).then(|| sum as f64 / ages.len() as f64),
            ages,
        }
    }
}

/// Conjunction of predicates. An empty filter places no constraint and
/// produces no WHERE clause at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    predicates: Vec<MemberPredicate>,
}

impl MemberFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn builder() -> MemberFilterBuilder {
        MemberFilterBuilder::default()
    }

    pub fn and(mut self, predicate: MemberPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[MemberPredicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether any predicate needs the team columns.
    pub fn references_team(&self) -> bool {
        self.predicates
            .iter()
            .any(|p| matches!(p, MemberPredicate::TeamNameEq(_)))
    }

    /// Whether any predicate compares against all members' ages.
    pub fn needs_age_snapshot(&self) -> bool {
        self.predicates.iter().any(MemberPredicate::needs_age_snapshot)
    }

    pub fn matches(
        &self,
        member: &Member,
        team: Option<&Team>,
        ages: &AgeSnapshot,
    ) -> bool {
        self.predicates.iter().all(|p| p.matches(member, team, ages))
    }
}

impl From<&MemberSearchCondition> for MemberFilter {
    fn from(condition: &MemberSearchCondition) -> Self {
        MemberFilter::builder()
            .and_opt(condition.username.clone(), MemberPredicate::UsernameEq)
            .and_opt(condition.team_name.clone(), MemberPredicate::TeamNameEq)
            .and_opt(condition.age_goe, MemberPredicate::AgeGoe)
            .and_opt(condition.age_loe, MemberPredicate::AgeLoe)
            .build()
    }
}

/// Folds optional values into a filter, skipping the absent ones.
#[derive(Debug, Default)]
pub struct MemberFilterBuilder {
    filter: MemberFilter,
}

impl MemberFilterBuilder {
    pub fn and(mut self, predicate: MemberPredicate) -> Self {
        self.filter = self.filter.and(predicate);
        self
    }

    pub fn and_opt<T, F>(self, value: Option<T>, predicate: F) -> Self
    where
        F: FnOnce(T) -> MemberPredicate,
    {
        match value {
            Some(value) => self.and(predicate(value)),
            None => self,
        }
    }

    pub fn build(self) -> MemberFilter {
        self.filter
    }
}
