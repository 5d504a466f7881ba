use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub parent_snap: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: Json,
    #[sea_orm(column_type = "Text")]
    pub totaltime: String,
    #[sea_orm(column_name = "type", column_type = "Text")]
    pub meal_type: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::snap::Entity",
        from = "Column::ParentSnap",
        to = "super::snap::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Snap,
}

impl Related<super::snap::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snap.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
