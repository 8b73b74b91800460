use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MitraServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<i64>,
}

/// Full profile; `services` and `images` replace whatever was stored before.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MitraProfileRequest {
    pub business_name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub province: String,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub weekday_hours: Option<String>,
    pub weekend_hours: Option<String>,
    #[serde(default)]
    pub services: Vec<MitraServiceInput>,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl MitraProfileRequest {
    pub fn validate(&self) -> AppResult<()> {
        for (value, field) in [
            (&self.business_name, "business_name"),
            (&self.address, "address"),
            (&self.city, "city"),
            (&self.province, "province"),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{field} is required")));
            }
        }
        for service in &self.services {
            if service.name.trim().is_empty() {
                return Err(AppError::validation("services.name is required"));
            }
            if service.price.is_some_and(|p| p < 0) {
                return Err(AppError::validation("services.price must not be negative"));
            }
        }
        if self.images.iter().any(|url| url.trim().is_empty()) {
            return Err(AppError::validation("images must not contain empty urls"));
        }
        Ok(())
    }
}
