use crate::{CollaboratorResult, Contact};

use async_trait::async_trait;
use uuid::Uuid;

/// Source of contacts and category ownership
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// The subset of `category_ids` owned by `owner_id`
    async fn owned_categories(
        &self,
        owner_id: Uuid,
        category_ids: &[Uuid],
    ) -> CollaboratorResult<Vec<Uuid>>;

    /// All contacts of `owner_id`, with category ids, ordered by (created_at, id)
    async fn contacts(&self, owner_id: Uuid) -> CollaboratorResult<Vec<Contact>>;
}
