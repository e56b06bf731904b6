pub mod analytics;
pub mod directory_service;
pub mod engagement_service;
pub mod error;
pub mod listing_service;
pub mod property_service;
pub mod storage;
