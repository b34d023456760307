pub mod mortgage;
pub mod user;
