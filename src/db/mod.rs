pub mod admindb;
pub mod agentdb;
pub mod db;
pub mod propertydb;
pub mod query;
pub mod sectordb;
