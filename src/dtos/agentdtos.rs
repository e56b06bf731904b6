use serde::{Deserialize, Serialize};
use validator::Validate;

use super::propertydtos::ImageUploadDto;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7-20 characters"))]
    pub phone: String,
    #[validate(length(min = 7, max = 20, message = "WhatsApp number must be between 7-20 characters"))]
    pub whatsapp: String,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[validate]
    pub image: Option<ImageUploadDto>,
}

fn default_rating() -> f64 {
    5.0
}
