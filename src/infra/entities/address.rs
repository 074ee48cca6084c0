//! Customer address, typed billing or delivery.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Address kinds accepted at the API boundary.
pub const ADDRESS_KINDS: &[&str] = &["billing", "delivery"];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    /// "billing" | "delivery"
    pub kind: String,
    pub country_id: i64,
    pub city: String,
    pub street: String,
    pub apartment: Option<String>,
    pub zip_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
