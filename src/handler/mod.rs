pub mod admin;
pub mod agents;
pub mod auth;
pub mod properties;
pub mod sectors;
