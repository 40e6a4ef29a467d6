use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the append-only `hits` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub app: String,
    pub uri: String,
    pub ip: String,
    /// Caller-supplied hit time
    pub created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Hit {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            app: model.app,
            uri: model.uri,
            ip: model.ip,
            timestamp: model.created,
        }
    }
}

// id comes from the BIGSERIAL sequence
impl From<crate::models::NewHit> for ActiveModel {
    fn from(input: crate::models::NewHit) -> Self {
        Self {
            id: NotSet,
            app: Set(input.app),
            uri: Set(input.uri),
            ip: Set(input.ip),
            created: Set(input.timestamp),
        }
    }
}
