pub mod me;
pub mod roles;
pub mod users;
