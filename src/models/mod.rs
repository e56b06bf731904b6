pub mod adminmodel;
pub mod agentmodel;
pub mod propertymodel;
pub mod sectormodel;
