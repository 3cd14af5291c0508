use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct Item {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
