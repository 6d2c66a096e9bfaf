//! Quotes table. Content is immutable after creation.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub quote_id: i64,
    pub content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chat_quotes::Entity")]
    ChatQuotes,
}

impl Related<super::chat_quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatQuotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
