pub mod admin;
pub mod messages;
