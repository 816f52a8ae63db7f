use std::collections::HashMap;

use color_eyre::eyre::eyre;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::{
    AgeStatistics, Direction, Member, MemberAssignment, MemberFilter,
    MemberId, MemberPredicate, MemberStore, MemberStoreError, MemberTeamRow,
    NewMember, NullHandling, Pageable, SortProperty, Team, TeamAgeAverage,
    TeamId, TeamName, Username,
};

const MEMBER_TEAM_ROWS: &str = r#"
    SELECT m.member_id, m.username, m.age, t.team_id, t.name AS team_name
    FROM members AS m
    LEFT JOIN teams AS t ON m.team_id = t.team_id
"#;

type MemberRecord = (i64, Option<String>, i32, Option<i64>);
type AgeRecord = (i64, i64, Option<f64>, Option<i32>, Option<i32>);

pub struct PostgresMemberStore {
    pool: PgPool,
    identity_map: HashMap<MemberId, Member>,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            identity_map: HashMap::new(),
        }
    }
}

/// Appends each predicate as an AND-ed condition. `has_where` tells whether
/// a WHERE clause is already open.
fn push_predicates(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &MemberFilter,
    mut has_where: bool,
) {
    for predicate in filter.predicates() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
        match predicate {
            MemberPredicate::UsernameEq(username) => {
                builder.push("m.username = ").push_bind(username.clone())
            }
            MemberPredicate::TeamNameEq(name) => {
                builder.push("t.name = ").push_bind(name.clone())
            }
            MemberPredicate::AgeEq(age) => {
                builder.push("m.age = ").push_bind(*age)
            }
            MemberPredicate::AgeGoe(age) => {
                builder.push("m.age >= ").push_bind(*age)
            }
            MemberPredicate::AgeLoe(age) => {
                builder.push("m.age <= ").push_bind(*age)
            }
            MemberPredicate::AgeGt(age) => {
                builder.push("m.age > ").push_bind(*age)
            }
            MemberPredicate::AgeLt(age) => {
                builder.push("m.age < ").push_bind(*age)
            }
            MemberPredicate::AgeEqMax => builder
                .push("m.age = (SELECT MAX(s.age) FROM members AS s)"),
            MemberPredicate::AgeGoeAvg => builder
                .push("m.age >= (SELECT AVG(s.age) FROM members AS s)"),
            MemberPredicate::AgeInAgesGt(bound) => builder
                .push("m.age IN (SELECT s.age FROM members AS s WHERE s.age > ")
                .push_bind(*bound)
                .push(")"),
        };
    }
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, pageable: &Pageable) {
    builder.push(" ORDER BY ");
    for order in &pageable.sort {
        builder.push(match order.property {
            SortProperty::MemberId => "m.member_id",
            SortProperty::Username => "m.username",
            SortProperty::Age => "m.age",
            SortProperty::TeamName => "t.name",
        });
        builder.push(match order.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
        builder.push(match order.nulls {
            NullHandling::Native => "",
            NullHandling::NullsFirst => " NULLS FIRST",
            NullHandling::NullsLast => " NULLS LAST",
        });
        builder.push(", ");
    }
    builder.push("m.member_id ASC");

    builder
        .push(" LIMIT ")
        .push_bind(i64::try_from(pageable.limit).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(pageable.offset).unwrap_or(i64::MAX));
}

fn push_assignment(
    builder: &mut QueryBuilder<'_, Postgres>,
    assignment: &MemberAssignment,
) {
    match assignment {
        MemberAssignment::SetUsername(username) => builder
            .push("username = ")
            .push_bind(username.as_ref().to_owned()),
        MemberAssignment::SetAge(age) => {
            builder.push("age = ").push_bind(*age)
        }
        MemberAssignment::AddAge(delta) => {
            builder.push("age = m.age + ").push_bind(*delta)
        }
        MemberAssignment::MultiplyAge(factor) => {
            builder.push("age = m.age * ").push_bind(*factor)
        }
    };
}

#[async_trait::async_trait]
impl MemberStore for PostgresMemberStore {
    #[tracing::instrument(name = "Adding team to PostgreSQL", skip_all)]
    async fn add_team(
        &mut self,
        team_name: TeamName,
    ) -> Result<Team, MemberStoreError> {
        let team_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO teams (name) VALUES ($1) RETURNING team_id
            "#,
        )
        .bind(team_name.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        Ok(Team::new(TeamId::new(team_id), team_name))
    }

    #[tracing::instrument(name = "Adding member to PostgreSQL", skip_all)]
    async fn add_member(
        &mut self,
        member: NewMember,
    ) -> Result<Member, MemberStoreError> {
        let member_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO members (username, age, team_id) VALUES ($1, $2, $3)
            RETURNING member_id
            "#,
        )
        .bind(member.username.as_ref().map(|u| u.as_ref().to_owned()))
        .bind(member.age)
        .bind(member.team_id.map(|id| *id.as_ref()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() =>
            {
                MemberStoreError::TeamNotFound
            }
            e => MemberStoreError::UnexpectedError(eyre!(e)),
        })?;

        Ok(member.into_member(MemberId::new(member_id)))
    }

    #[tracing::instrument(name = "Getting team from PostgreSQL", skip_all)]
    async fn find_team(
        &self,
        team_id: &TeamId,
    ) -> Result<Team, MemberStoreError> {
        let (id, name): (i64, String) = sqlx::query_as(
            r#"
            SELECT team_id, name FROM teams WHERE team_id = $1
            "#,
        )
        .bind(team_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => MemberStoreError::TeamNotFound,
            e => MemberStoreError::UnexpectedError(eyre!(e)),
        })?;

        let team_name = TeamName::parse(&name)
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;
        Ok(Team::new(TeamId::new(id), team_name))
    }

    #[tracing::instrument(name = "Getting member from PostgreSQL", skip_all)]
    async fn find_member(
        &mut self,
        member_id: &MemberId,
    ) -> Result<Member, MemberStoreError> {
        if let Some(member) = self.identity_map.get(member_id) {
            tracing::debug!(
                "member {} served from identity map",
                member_id.as_ref()
            );
            return Ok(member.clone());
        }

        let (id, username, age, team_id): MemberRecord = sqlx::query_as(
            r#"
            SELECT member_id, username, age, team_id
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => MemberStoreError::MemberNotFound,
            e => MemberStoreError::UnexpectedError(eyre!(e)),
        })?;

        let username = username
            .map(|name| Username::parse(&name))
            .transpose()
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;
        let member = Member {
            member_id: MemberId::new(id),
            username,
            age,
            team_id: team_id.map(TeamId::new),
        };
        self.identity_map.insert(member.member_id, member.clone());
        Ok(member)
    }

    #[tracing::instrument(name = "Searching members in PostgreSQL", skip_all)]
    async fn search_members(
        &self,
        filter: &MemberFilter,
        pageable: Option<&Pageable>,
    ) -> Result<Vec<MemberTeamRow>, MemberStoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(MEMBER_TEAM_ROWS);
        push_predicates(&mut builder, filter, false);
        match pageable {
            Some(pageable) => push_page(&mut builder, pageable),
            None => {
                builder.push(" ORDER BY m.member_id ASC");
            }
        }

        builder
            .build_query_as::<MemberTeamRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(name = "Counting members in PostgreSQL", skip_all)]
    async fn count_members(
        &self,
        filter: &MemberFilter,
    ) -> Result<u64, MemberStoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*)
            FROM members AS m
            LEFT JOIN teams AS t ON m.team_id = t.team_id
            "#,
        );
        push_predicates(&mut builder, filter, false);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;
        u64::try_from(count)
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(
        name = "Bulk updating members in PostgreSQL",
        skip_all
    )]
    async fn bulk_update(
        &mut self,
        filter: &MemberFilter,
        assignment: &MemberAssignment,
    ) -> Result<u64, MemberStoreError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE members AS m SET ");
        push_assignment(&mut builder, assignment);
        let joins_team = filter.references_team();
        if joins_team {
            builder.push(" FROM teams AS t WHERE m.team_id = t.team_id");
        }
        push_predicates(&mut builder, filter, joins_team);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;
        tracing::debug!(
            "bulk update affected {} members",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        name = "Bulk deleting members in PostgreSQL",
        skip_all
    )]
    async fn bulk_delete(
        &mut self,
        filter: &MemberFilter,
    ) -> Result<u64, MemberStoreError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("DELETE FROM members AS m");
        let joins_team = filter.references_team();
        if joins_team {
            builder.push(" USING teams AS t WHERE m.team_id = t.team_id");
        }
        push_predicates(&mut builder, filter, joins_team);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;
        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        name = "Aggregating member ages in PostgreSQL",
        skip_all
    )]
    async fn age_statistics(
        &self,
        filter: &MemberFilter,
    ) -> Result<AgeStatistics, MemberStoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(m.age), 0)::BIGINT,
                   AVG(m.age)::FLOAT8,
                   MAX(m.age),
                   MIN(m.age)
            FROM members AS m
            LEFT JOIN teams AS t ON m.team_id = t.team_id
            "#,
        );
        push_predicates(&mut builder, filter, false);

        let (count, sum, avg, max, min) = builder
            .build_query_as::<AgeRecord>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        Ok(AgeStatistics {
            count,
            sum,
            avg,
            max,
            min,
        })
    }

    #[tracing::instrument(
        name = "Averaging ages per team in PostgreSQL",
        skip_all
    )]
    async fn average_age_by_team(
        &self,
    ) -> Result<Vec<TeamAgeAverage>, MemberStoreError> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            r#"
            SELECT t.name, AVG(m.age)::FLOAT8
            FROM members AS m
            INNER JOIN teams AS t ON m.team_id = t.team_id
            GROUP BY t.name
            ORDER BY t.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MemberStoreError::UnexpectedError(eyre!(e)))?;

        Ok(rows
            .into_iter()
            .map(|(team_name, average_age)| TeamAgeAverage {
                team_name,
                average_age,
            })
            .collect())
    }

    async fn clear_cache(&mut self) {
        self.identity_map.clear();
    }
}
