use crate::helpers::TestApp;

use member_search::{
    domain::{
        MemberAssignment, MemberFilter, MemberId, MemberPredicate,
        MemberSearchCondition, MemberStore, MemberStoreError, MemberTeamRow,
        NewMember, Pageable, SortOrder, SortProperty, TeamId, TeamAgeAverage,
        Username,
    },
    services::member_search::{search_page_complex, search_page_simple},
};
use test_context::test_context;

fn usernames(rows: &[MemberTeamRow]) -> Vec<&str> {
    rows.iter()
        .map(|row| row.username.as_deref().unwrap_or_default())
        .collect()
}

async fn ages(app: &TestApp) -> Vec<i32> {
    app.member_store
        .read()
        .await
        .search_members(&MemberFilter::all(), None)
        .await
        .unwrap()
        .iter()
        .map(|row| row.age)
        .collect()
}

fn team_name_eq(name: &str) -> MemberFilter {
    MemberFilter::all().and(MemberPredicate::TeamNameEq(name.to_owned()))
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_leave_loaded_member_stale_until_cache_is_cleared(
    app: &mut TestApp,
) {
    app.seed_members().await;
    let mut store = app.member_store.write().await;
    let member1 = MemberId::new(1);
    assert_eq!(store.find_member(&member1).await.unwrap().age, 10);

    let updated = store
        .bulk_update(&MemberFilter::all(), &MemberAssignment::AddAge(1))
        .await
        .unwrap();
    assert_eq!(updated, 4);
    assert_eq!(store.find_member(&member1).await.unwrap().age, 10);

    store.clear_cache().await;
    assert_eq!(store.find_member(&member1).await.unwrap().age, 11);
    drop(store);

    assert_eq!(ages(app).await, vec![11, 21, 31, 41]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_bulk_delete_members_older_than_bound(app: &mut TestApp) {
    app.seed_members().await;
    let removed = app
        .member_store
        .write()
        .await
        .bulk_delete(&MemberFilter::all().and(MemberPredicate::AgeGt(28)))
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(ages(app).await, vec![10, 20]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_bulk_update_and_delete_by_team_name(app: &mut TestApp) {
    app.seed_members().await;
    let mut store = app.member_store.write().await;

    let guest = Username::parse("guest").unwrap();
    let updated = store
        .bulk_update(
            &team_name_eq("teamB"),
            &MemberAssignment::SetUsername(guest),
        )
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let rows = store
        .search_members(&MemberFilter::all(), None)
        .await
        .unwrap();
    assert_eq!(
        usernames(&rows),
        vec!["member1", "member2", "guest", "guest"]
    );

    let removed = store.bulk_delete(&team_name_eq("teamA")).await.unwrap();
    assert_eq!(removed, 2);
    let rows = store
        .search_members(&MemberFilter::all(), None)
        .await
        .unwrap();
    assert_eq!(usernames(&rows), vec!["guest", "guest"]);
    assert!(rows.iter().all(|row| row.team_name.as_deref() == Some("teamB")));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_overflowing_bulk_update_without_partial_writes(
    app: &mut TestApp,
) {
    app.seed_members().await;
    let mut store = app.member_store.write().await;
    store
        .add_member(NewMember::new(None, i32::MAX, None))
        .await
        .unwrap();

    let result = store
        .bulk_update(&MemberFilter::all(), &MemberAssignment::AddAge(1))
        .await;
    assert!(matches!(result, Err(MemberStoreError::UnexpectedError(_))));
    drop(store);

    assert_eq!(ages(app).await, vec![10, 20, 30, 40, i32::MAX]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_page_sorted_rows_with_total(app: &mut TestApp) {
    app.seed_members().await;
    let store = app.member_store.read().await;
    let condition = MemberSearchCondition::default();
    let pageable = Pageable::of(1, 2)
        .with_sort(SortOrder::desc(SortProperty::Username));

    let page = search_page_simple(&*store, &condition, &pageable)
        .await
        .unwrap();
    assert_eq!(usernames(&page.content), vec!["member3", "member2"]);
    assert_eq!(page.total, 4);

    let complex = search_page_complex(&*store, &condition, &pageable)
        .await
        .unwrap();
    assert_eq!(complex, page);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_sort_age_desc_then_username_nulls_last(app: &mut TestApp) {
    let mut store = app.member_store.write().await;
    store.add_member(NewMember::new(None, 100, None)).await.unwrap();
    for name in ["member6", "member5"] {
        store
            .add_member(NewMember::new(
                Some(Username::parse(name).unwrap()),
                100,
                None,
            ))
            .await
            .unwrap();
    }
    store.add_member(NewMember::new(None, 10, None)).await.unwrap();

    let pageable = Pageable::of(0, 10)
        .with_sort(SortOrder::desc(SortProperty::Age))
        .with_sort(SortOrder::asc(SortProperty::Username).nulls_last());
    let rows = store
        .search_members(&MemberFilter::all(), Some(&pageable))
        .await
        .unwrap();
    assert_eq!(
        rows.iter()
            .map(|row| (row.age, row.username.as_deref()))
            .collect::<Vec<_>>(),
        vec![
            (100, Some("member5")),
            (100, Some("member6")),
            (100, None),
            (10, None),
        ]
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_aggregate_ages(app: &mut TestApp) {
    app.seed_members().await;
    let store = app.member_store.read().await;

    let stats = store.age_statistics(&MemberFilter::all()).await.unwrap();
    assert_eq!(stats.count, 4);
    assert_eq!(stats.sum, 100);
    assert_eq!(stats.avg, Some(25.0));
    assert_eq!(stats.max, Some(40));
    assert_eq!(stats.min, Some(10));

    let empty = store
        .age_statistics(&team_name_eq("teamZ"))
        .await
        .unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.sum, 0);
    assert_eq!(empty.avg, None);

    assert_eq!(
        store.average_age_by_team().await.unwrap(),
        vec![
            TeamAgeAverage {
                team_name: "teamA".to_owned(),
                average_age: 15.0
            },
            TeamAgeAverage {
                team_name: "teamB".to_owned(),
                average_age: 35.0
            },
        ]
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_compare_against_all_member_ages(app: &mut TestApp) {
    app.seed_members().await;
    let store = app.member_store.read().await;

    for (predicate, expected) in [
        (MemberPredicate::AgeEqMax, vec![40]),
        (MemberPredicate::AgeGoeAvg, vec![30, 40]),
        (MemberPredicate::AgeInAgesGt(20), vec![30, 40]),
    ] {
        let filter = MemberFilter::all().and(predicate);
        let rows = store.search_members(&filter, None).await.unwrap();
        assert_eq!(
            rows.iter().map(|row| row.age).collect::<Vec<_>>(),
            expected,
            "unexpected ages for {:?}",
            filter
        );
        assert_eq!(
            store.count_members(&filter).await.unwrap(),
            expected.len() as u64
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_missing_members_and_teams(app: &mut TestApp) {
    let mut store = app.member_store.write().await;
    assert_eq!(
        store
            .add_member(NewMember::new(None, 10, Some(TeamId::new(99))))
            .await,
        Err(MemberStoreError::TeamNotFound)
    );
    assert_eq!(
        store.find_member(&MemberId::new(1)).await,
        Err(MemberStoreError::MemberNotFound)
    );
    assert_eq!(
        store.find_team(&TeamId::new(1)).await,
        Err(MemberStoreError::TeamNotFound)
    );
}
