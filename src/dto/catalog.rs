use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Mitra, MitraImage, MitraService, Product, RentalItem, Service, Technician},
};

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
pub struct RentalItemList {
    pub items: Vec<RentalItem>,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}

#[derive(Serialize, ToSchema)]
pub struct TechnicianList {
    pub items: Vec<Technician>,
}

/// Technician with rating figures derived from reviews of their orders.
#[derive(Serialize, ToSchema)]
pub struct TechnicianDetail {
    pub technician: Technician,
    pub name: String,
    pub average_rating: f64,
    pub review_count: i64,
    pub services: Vec<Service>,
}

#[derive(Serialize, ToSchema)]
pub struct MitraList {
    pub items: Vec<Mitra>,
}

#[derive(Serialize, ToSchema)]
pub struct MitraDetail {
    pub mitra: Mitra,
    pub services: Vec<MitraService>,
    pub images: Vec<MitraImage>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub price: i64,
    pub stock: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRentalItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price_per_day: i64,
    pub stock: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRentalItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price_per_day: Option<i64>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

pub fn check_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(())
}

pub fn check_amount(value: i64, field: &str) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

pub fn check_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::validation("stock must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub duration: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub duration: Option<String>,
    pub is_active: Option<bool>,
}

/// A service is bookable with a fixed price or a min/max range.
pub fn check_service_pricing(
    price: Option<i64>,
    min_price: Option<i64>,
    max_price: Option<i64>,
) -> AppResult<()> {
    for (value, field) in [(price, "price"), (min_price, "min_price"), (max_price, "max_price")] {
        if let Some(value) = value {
            check_amount(value, field)?;
        }
    }
    match (price, min_price, max_price) {
        (_, Some(min), Some(max)) if min > max => Err(AppError::validation(
            "min_price must not exceed max_price",
        )),
        (None, None, _) => Err(AppError::validation("price or min_price is required")),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTechnicianRequest {
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub experience: Option<i32>,
    #[serde(default)]
    pub specialties: Vec<String>,
}
