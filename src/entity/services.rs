use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::technicians::Entity",
        from = "Column::TechnicianId",
        to = "super::technicians::Column::Id"
    )]
    Technicians,
}

impl Related<super::technicians::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technicians.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
