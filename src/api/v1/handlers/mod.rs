pub mod health;
pub mod me;
pub mod notifications;
pub mod roles;
pub mod users;
