mod helpers;
mod member_store;
