use crate::domain::{
    MemberFilter, MemberSearchCondition, MemberStore, MemberStoreError,
    MemberTeamRow, Page, Pageable,
};

/// All rows matching `condition`, in member id order.
#[tracing::instrument(name = "Search members", skip_all)]
pub async fn search<S>(
    store: &S,
    condition: &MemberSearchCondition,
) -> Result<Vec<MemberTeamRow>, MemberStoreError>
where
    S: MemberStore + Sync + ?Sized,
{
    let filter = MemberFilter::from(condition);
    tracing::debug!("search filter: {:?}", filter);
    store.search_members(&filter, None).await
}

/// One page of matching rows plus an exact total from a separate count query.
#[tracing::instrument(name = "Search members page with count", skip_all)]
pub async fn search_page_simple<S>(
    store: &S,
    condition: &MemberSearchCondition,
    pageable: &Pageable,
) -> Result<Page<MemberTeamRow>, MemberStoreError>
where
    S: MemberStore + Sync + ?Sized,
{
    let filter = MemberFilter::from(condition);
    let content = store.search_members(&filter, Some(pageable)).await?;
    let total = store.count_members(&filter).await?;
    Ok(Page::new(content, pageable, total))
}

/// Like [`search_page_simple`], but skips the count query when the fetched
/// page already proves the total.
#[tracing::instrument(name = "Search members page", skip_all)]
pub async fn search_page_complex<S>(
    store: &S,
    condition: &MemberSearchCondition,
    pageable: &Pageable,
) -> Result<Page<MemberTeamRow>, MemberStoreError>
where
    S: MemberStore + Sync + ?Sized,
{
    let filter = MemberFilter::from(condition);
    let content = store.search_members(&filter, Some(pageable)).await?;

    let total = if needs_count_query(pageable, content.len()) {
        store.count_members(&filter).await?
    } else {
        tracing::debug!("count query skipped, first page is partial");
        content.len() as u64
    };
    Ok(Page::new(content, pageable, total))
}

/// Only a short first page settles the total. Any other page, including a
/// short page further in, is counted.
pub fn needs_count_query(pageable: &Pageable, fetched: usize) -> bool {
    !(pageable.offset == 0 && (fetched as u64) < pageable.limit)
}
