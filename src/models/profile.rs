use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The site owner's public profile. There is exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub avatar: String,
}
