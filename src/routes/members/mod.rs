mod search_members;

pub use search_members::search_members;
