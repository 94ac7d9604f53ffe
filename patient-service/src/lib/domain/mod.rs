pub mod patient;
pub mod user;
