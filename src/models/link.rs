use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    /// 16 hex characters, assigned when the link is added
    pub id: String,
    pub title: String,
    pub url: String,
    pub category: String,
    pub icon: String,
    pub featured: bool,
}
