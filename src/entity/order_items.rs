use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemType {
    #[sea_orm(string_value = "SERVICE")]
    Service,
    #[sea_orm(string_value = "PRODUCT")]
    Product,
    #[sea_orm(string_value = "RENTAL")]
    Rental,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::rental_items::Entity",
        from = "Column::RentalItemId",
        to = "super::rental_items::Column::Id"
    )]
    RentalItems,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::rental_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
