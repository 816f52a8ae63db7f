use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::MemberTeamRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortProperty {
    MemberId,
    Username,
    Age,
    TeamName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// Where nulls go. `Native` follows PostgreSQL: last when ascending, first
/// when descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullHandling {
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub property: SortProperty,
    pub direction: Direction,
    pub nulls: NullHandling,
}

impl SortOrder {
    pub fn asc(property: SortProperty) -> Self {
        Self {
            property,
            direction: Direction::Asc,
            nulls: NullHandling::Native,
        }
    }

    pub fn desc(property: SortProperty) -> Self {
        Self {
            property,
            direction: Direction::Desc,
            nulls: NullHandling::Native,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullHandling::NullsFirst;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullHandling::NullsLast;
        self
    }

    pub fn places_nulls_last(&self) -> bool {
        match self.nulls {
            NullHandling::NullsFirst => false,
            NullHandling::NullsLast => true,
            NullHandling::Native => self.direction == Direction::Asc,
        }
    }

    pub fn compare(&self, a: &MemberTeamRow, b: &MemberTeamRow) -> Ordering {
        match self.property {
            SortProperty::MemberId => {
                self.directed(a.member_id.cmp(&b.member_id))
            }
            SortProperty::Age => self.directed(a.age.cmp(&b.age)),
            SortProperty::Username => {
                self.compare_nullable(a.username.as_ref(), b.username.as_ref())
            }
            SortProperty::TeamName => self
                .compare_nullable(a.team_name.as_ref(), b.team_name.as_ref()),
        }
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    fn compare_nullable<T: Ord>(
        &self,
        a: Option<&T>,
        b: Option<&T>,
    ) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.directed(a.cmp(b)),
            (None, None) => Ordering::Equal,
            (None, Some(_)) if self.places_nulls_last() => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) if self.places_nulls_last() => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        }
    }
}

/// Offset, limit and sort for one page. Without an explicit sort rows come
/// back in member id order; an explicit sort is tie-broken by member id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    pub offset: u64,
    pub limit: u64,
    pub sort: Vec<SortOrder>,
}

impl Pageable {
    pub fn of(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    pub fn compare(&self, a: &MemberTeamRow, b: &MemberTeamRow) -> Ordering {
        self.sort
            .iter()
            .map(|order| order.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.member_id.cmp(&b.member_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total: u64) -> Self {
        Self {
            content,
            total,
            offset: pageable.offset,
            limit: pageable.limit,
        }
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.content.len() as u64) < self.total
    }
}
