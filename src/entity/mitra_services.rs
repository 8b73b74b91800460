use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mitra_services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub mitra_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mitras::Entity",
        from = "Column::MitraId",
        to = "super::mitras::Column::Id"
    )]
    Mitras,
}

impl Related<super::mitras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mitras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
