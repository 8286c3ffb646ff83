use std::sync::Arc;

use recite_core::model::{Poem, PoemDraft, PoemId};
use storage::repository::PoemRepository;

use crate::error::PoemServiceError;

/// Orchestrates poem validation and persistence.
#[derive(Clone)]
pub struct PoemService {
    poems: Arc<dyn PoemRepository>,
}

impl PoemService {
    #[must_use]
    pub fn new(poems: Arc<dyn PoemRepository>) -> Self {
        Self { poems }
    }

    /// All poems in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `PoemServiceError::Storage` if the collection cannot be read.
    pub async fn list_poems(&self) -> Result<Vec<Poem>, PoemServiceError> {
        Ok(self.poems.list_poems().await?)
    }

    /// Validate a draft and store it under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `PoemServiceError::Poem` for an empty title or a poem without
    /// content lines, and `PoemServiceError::Storage` if persistence fails.
    pub async fn add_poem(&self, draft: PoemDraft) -> Result<Poem, PoemServiceError> {
        let validated = draft.validate()?;
        let poem = self.poems.insert_poem(validated).await?;
        tracing::info!(
            poem_id = %poem.id(),
            title = poem.title(),
            lines = poem.content_line_count(),
            "poem added"
        );
        Ok(poem)
    }

    /// Remove a poem and its history. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `PoemServiceError::Storage` if persistence fails.
    pub async fn remove_poem(&self, id: &PoemId) -> Result<(), PoemServiceError> {
        self.poems.delete_poem(id).await?;
        tracing::info!(poem_id = %id, "poem removed");
        Ok(())
    }

    /// Fetch a poem by id.
    ///
    /// # Errors
    ///
    /// Returns `PoemServiceError::NotFound` when the id is unknown.
    pub async fn poem(&self, id: &PoemId) -> Result<Poem, PoemServiceError> {
        self.poems
            .get_poem(id)
            .await?
            .ok_or(PoemServiceError::NotFound)
    }

    /// Fetch a poem by id, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `PoemServiceError::Storage` for backend failures.
    pub async fn find_poem(&self, id: &PoemId) -> Result<Option<Poem>, PoemServiceError> {
        Ok(self.poems.get_poem(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recite_core::model::PoemError;
    use storage::repository::InMemoryRepository;

    fn service() -> PoemService {
        PoemService::new(Arc::new(InMemoryRepository::new()))
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn add_then_list_and_remove() {
        let svc = service();
        let first = svc
            .add_poem(PoemDraft::new("One", "A", lines(&["a", "", "b"])))
            .await
            .unwrap();
        let second = svc
            .add_poem(PoemDraft::new("Two", "B", lines(&["c"])))
            .await
            .unwrap();

        svc.remove_poem(first.id()).await.unwrap();

        let left = svc.list_poems().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id(), second.id());
        assert!(svc.find_poem(first.id()).await.unwrap().is_none());
        assert!(matches!(
            svc.poem(first.id()).await,
            Err(PoemServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn all_blank_poem_is_rejected_before_storage() {
        let svc = service();
        let err = svc
            .add_poem(PoemDraft::new("Empty", "Nobody", lines(&["", "  "])))
            .await
            .unwrap_err();
        assert!(matches!(err, PoemServiceError::Poem(PoemError::NoContentLines)));
        assert!(svc.list_poems().await.unwrap().is_empty());
    }
}
