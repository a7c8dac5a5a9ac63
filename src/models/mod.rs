pub mod user;
pub mod api;
