mod assignment;
mod data_stores;
mod error;
mod member;
mod member_id;
mod member_team_row;
mod pageable;
mod predicate;
mod search_condition;
mod statistics;
mod team;
mod team_id;
mod team_name;
mod username;

pub use assignment::*;
pub use data_stores::*;
pub use error::*;
pub use member::*;
pub use member_id::*;
pub use member_team_row::*;
pub use pageable::*;
pub use predicate::*;
pub use search_condition::*;
pub use statistics::*;
pub use team::*;
pub use team_id::*;
pub use team_name::*;
pub use username::*;
