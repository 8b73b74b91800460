use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Review,
    routes::params::Pagination,
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// Review of the technician who handled this order.
    pub order_id: Option<Uuid>,
    /// Review of a mitra business.
    pub mitra_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSubject {
    Order(Uuid),
    Mitra(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub subject: ReviewSubject,
    pub rating: i32,
    pub comment: Option<String>,
}

impl ReviewRequest {
    pub fn validate(self) -> AppResult<ValidReview> {
        let subject = match (self.order_id, self.mitra_id) {
            (Some(order_id), None) => ReviewSubject::Order(order_id),
            (None, Some(mitra_id)) => ReviewSubject::Mitra(mitra_id),
            (None, None) => {
                return Err(AppError::validation("order_id or mitra_id is required"));
            }
            (Some(_), Some(_)) => {
                return Err(AppError::validation(
                    "only one of order_id or mitra_id may be given",
                ));
            }
        };
        let rating = self
            .rating
            .ok_or_else(|| AppError::validation("rating is required"))?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        let comment = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(ValidReview {
            subject,
            rating,
            comment,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub mitra_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
}

impl ReviewQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<Review>,
    pub average_rating: f64,
    pub total_review: i64,
}
