use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateSectorDto {
    #[validate(length(min = 1, max = 100, message = "Sector name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SectorQueryDto {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}
