use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only moderation event log. Rows are never updated or deleted;
/// weekly windows must be able to look back seven days from any query time.
///
/// `kind` is stored as a plain string rather than a database enum so that
/// rows written by newer deployments still aggregate (into the catch-all
/// bucket) instead of failing to decode.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Eq)]
#[sea_orm(table_name = "moderation_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub guild_id: i64,
    pub kind: String,
    pub actor_id: i64,
    pub target_id: i64,
    pub recorded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
