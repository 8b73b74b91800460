use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    self, MitraStatus, OrderItemType, OrderStatus, UserRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub mitra_status: Option<MitraStatus>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            phone: model.phone,
            role: model.role,
            mitra_status: model.mitra_status,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Technician {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub experience: i32,
    pub specialties: Vec<String>,
    pub rating: f64,
    pub total_review: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::technicians::Model> for Technician {
    fn from(model: entity::technicians::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            bio: model.bio,
            experience: model.experience,
            specialties: model.specialties,
            rating: model.rating,
            total_review: model.total_review,
            is_available: model.is_available,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Mitra {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub rating: f64,
    pub total_review: i32,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::mitras::Model> for Mitra {
    fn from(model: entity::mitras::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            business_name: model.business_name,
            description: model.description,
            address: model.address,
            city: model.city,
            province: model.province,
            phone: model.phone,
            whatsapp: model.whatsapp,
            email: model.email,
            weekday_hours: model.weekday_hours,
            weekend_hours: model.weekend_hours,
            rating: model.rating,
            total_review: model.total_review,
            is_approved: model.is_approved,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MitraService {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<i64>,
}

impl From<entity::mitra_services::Model> for MitraService {
    fn from(model: entity::mitra_services::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MitraImage {
    pub id: Uuid,
    pub url: String,
    pub position: i32,
}

impl From<entity::mitra_images::Model> for MitraImage {
    fn from(model: entity::mitra_images::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            position: model.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category: model.category,
            brand: model.brand,
            image_url: model.image_url,
            price: model.price,
            stock: model.stock,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price_per_day: i64,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::rental_items::Model> for RentalItem {
    fn from(model: entity::rental_items::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category: model.category,
            image_url: model.image_url,
            price_per_day: model.price_per_day,
            stock: model.stock,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub technician_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub duration: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::services::Model> for Service {
    fn from(model: entity::services::Model) -> Self {
        Self {
            id: model.id,
            technician_id: model.technician_id,
            name: model.name,
            description: model.description,
            category: model.category,
            price: model.price,
            min_price: model.min_price,
            max_price: model.max_price,
            duration: model.duration,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub status: OrderStatus,
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub deposit: i64,
    pub total: i64,
    pub notes: Option<String>,
    pub phone_type: Option<String>,
    pub schedule_type: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            user_id: model.user_id,
            technician_id: model.technician_id,
            status: model.status,
            subtotal: model.subtotal,
            tax: model.tax,
            discount: model.discount,
            deposit: model.deposit,
            total: model.total,
            notes: model.notes,
            phone_type: model.phone_type,
            schedule_type: model.schedule_type,
            scheduled_date: model.scheduled_date,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_type: OrderItemType,
    pub service_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub rental_item_id: Option<Uuid>,
    pub quantity: i32,
    pub rental_days: Option<i32>,
    pub unit_price: i64,
    pub subtotal: i64,
    pub created_at: DateTime<Utc>,
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            item_type: model.item_type,
            service_id: model.service_id,
            product_id: model.product_id,
            rental_item_id: model.rental_item_id,
            quantity: model.quantity,
            rental_days: model.rental_days,
            unit_price: model.unit_price,
            subtotal: model.subtotal,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub mitra_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::reviews::Model> for Review {
    fn from(model: entity::reviews::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            order_id: model.order_id,
            mitra_id: model.mitra_id,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRoom {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub technician_id: Uuid,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::chat_rooms::Model> for ChatRoom {
    fn from(model: entity::chat_rooms::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            technician_id: model.technician_id,
            last_message_at: model.last_message_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_size: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::chat_messages::Model> for ChatMessage {
    fn from(model: entity::chat_messages::Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            sender_id: model.sender_id,
            content: model.content,
            media_url: model.media_url,
            media_size: model.media_size,
            is_read: model.is_read,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
