use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    services::pricing::{DurationType, MAX_RENTAL_DAYS, MIN_RENTAL_DAYS, RentalQuote},
};

const SCHEDULED: &str = "scheduled";
const DEFAULT_SCHEDULE: &str = "now";

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub service_id: Option<Uuid>,
    /// `scheduled` requires `date`; anything else books the earliest slot.
    pub schedule_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub phone_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBooking {
    pub service_id: Uuid,
    pub schedule_type: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub phone_type: String,
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("{field} is required")))
}

impl BookingRequest {
    pub fn validate(self) -> AppResult<ServiceBooking> {
        let service_id = self
            .service_id
            .ok_or_else(|| AppError::validation("service_id is required"))?;
        let phone_type = required_text(self.phone_type, "phone_type")?;
        let description = required_text(self.description, "description")?;
        let schedule_type = self
            .schedule_type
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEDULE.to_string());

        let date = if schedule_type == SCHEDULED {
            Some(self.date.ok_or_else(|| {
                AppError::validation("date is required for scheduled bookings")
            })?)
        } else {
            None
        };

        Ok(ServiceBooking {
            service_id,
            schedule_type,
            date,
            description,
            phone_type,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SparepartOrderRequest {
    pub product_id: Option<Uuid>,
    /// Defaults to 1.
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparepartPurchase {
    pub product_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl SparepartOrderRequest {
    pub fn validate(self) -> AppResult<SparepartPurchase> {
        let product_id = self
            .product_id
            .ok_or_else(|| AppError::validation("product_id is required"))?;
        let quantity = self.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        Ok(SparepartPurchase {
            product_id,
            quantity,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RentalOrderRequest {
    pub rental_item_id: Option<Uuid>,
    /// Days, 1 to 365.
    pub duration: Option<i32>,
    pub duration_type: Option<DurationType>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalBooking {
    pub rental_item_id: Uuid,
    pub duration: i32,
    pub duration_type: DurationType,
    pub notes: Option<String>,
}

impl RentalOrderRequest {
    pub fn validate(self) -> AppResult<RentalBooking> {
        let rental_item_id = self
            .rental_item_id
            .ok_or_else(|| AppError::validation("rental_item_id is required"))?;
        let duration = self
            .duration
            .ok_or_else(|| AppError::validation("duration is required"))?;
        if !(MIN_RENTAL_DAYS..=MAX_RENTAL_DAYS).contains(&duration) {
            return Err(AppError::validation(format!(
                "duration must be between {MIN_RENTAL_DAYS} and {MAX_RENTAL_DAYS} days"
            )));
        }
        Ok(RentalBooking {
            rental_item_id,
            duration,
            duration_type: self.duration_type.unwrap_or(DurationType::Daily),
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// One of PENDING_PAYMENT, PAID, IN_PROGRESS, COMPLETED, CANCELLED.
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub order_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalOrderCreated {
    pub order_id: Uuid,
    pub order_number: String,
    pub quote: RentalQuote,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
