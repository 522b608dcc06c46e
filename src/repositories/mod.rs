pub mod credentials;
pub mod messages;
