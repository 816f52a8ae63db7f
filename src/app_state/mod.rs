use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::MemberStore;

pub type MemberStoreType = Arc<RwLock<dyn MemberStore + Send + Sync>>;

#[derive(Clone)]
pub struct AppState {
    pub member_store: MemberStoreType,
}

impl AppState {
    pub fn new(member_store: MemberStoreType) -> Self {
        Self { member_store }
    }
}
