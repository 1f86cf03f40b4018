use async_trait::async_trait;

use crate::{domain::Cursor, Result};

/// Port for the remote homework review API.
///
/// Implementations return the raw JSON body; checking its shape is left to
/// `validation::check_response`.
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    async fn fetch(&self, from_date: Cursor) -> Result<serde_json::Value>;
}
