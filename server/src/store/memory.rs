//! In-process document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use todo_core::{Page, Paginated, Todo, TodoFields, TodoFilter, TodoPatch};
use uuid::Uuid;

use super::{StoreResult, TodoStore};

/// A stored document plus its insertion sequence, used to order documents
/// created within the same clock tick.
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    todo: Todo,
}

#[derive(Debug, Default)]
struct Documents {
    next_seq: u64,
    by_id: HashMap<Uuid, Entry>,
}

/// `TodoStore` backed by a `HashMap` behind an async lock.
///
/// Cloning shares the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<Documents>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self, filter: &TodoFilter, page: Page) -> StoreResult<Paginated<Todo>> {
        let docs = self.docs.read().await;
        let mut matching: Vec<&Entry> = docs
            .by_id
            .values()
            .filter(|entry| filter.matches(&entry.todo))
            .collect();
        matching.sort_by(|a, b| {
            b.todo
                .created_at
                .cmp(&a.todo.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .map(|entry| entry.todo.clone())
            .collect();
        Ok(Paginated { items, total })
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let docs = self.docs.read().await;
        Ok(docs.by_id.get(&id).map(|entry| entry.todo.clone()))
    }

    async fn create(&self, fields: TodoFields) -> StoreResult<Todo> {
        let now = Utc::now();
        let todo = Todo::from_fields(Uuid::new_v4(), fields, now, now);

        let mut docs = self.docs.write().await;
        let seq = docs.next_seq;
        docs.next_seq += 1;
        docs.by_id.insert(
            todo.id,
            Entry {
                seq,
                todo: todo.clone(),
            },
        );
        Ok(todo)
    }

    async fn replace(&self, id: Uuid, fields: TodoFields) -> StoreResult<Option<Todo>> {
        let mut docs = self.docs.write().await;
        let Some(entry) = docs.by_id.get_mut(&id) else {
            return Ok(None);
        };
        entry.todo.set_fields(fields);
        entry.todo.updated_at = Utc::now();
        Ok(Some(entry.todo.clone()))
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> StoreResult<Option<Todo>> {
        let mut docs = self.docs.write().await;
        let Some(entry) = docs.by_id.get_mut(&id) else {
            return Ok(None);
        };
        let mut fields = entry.todo.fields();
        patch.apply(&mut fields);
        entry.todo.set_fields(fields);
        entry.todo.updated_at = Utc::now();
        Ok(Some(entry.todo.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let mut docs = self.docs.write().await;
        Ok(docs.by_id.remove(&id).map(|entry| entry.todo))
    }
}

#[cfg(test)]
mod tests {
    use todo_core::ListParams;

    use super::*;

    async fn seed(store: &MemoryStore, titles: &[&str]) -> Vec<Todo> {
        let mut created = Vec::new();
        for title in titles {
            created.push(store.create(TodoFields::with_title(*title)).await.unwrap());
        }
        created
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let todo = store.create(TodoFields::with_title("a")).await.unwrap();
        assert_eq!(todo.created_at, todo.updated_at);
        assert_eq!(store.get(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_windowed() {
        let store = MemoryStore::new();
        seed(&store, &["one", "two", "three", "four"]).await;

        let page = store.list(&TodoFilter::default(), Page::new(2, 1)).await.unwrap();
        assert_eq!(page.total, 4);
        let titles: Vec<_> = page.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two"]);
    }

    #[tokio::test]
    async fn list_applies_filter_before_counting() {
        let store = MemoryStore::new();
        let created = seed(&store, &["foo", "bar", "food"]).await;
        let patch = TodoPatch {
            completed: Some(true),
            ..Default::default()
        };
        store.update(created[0].id, patch).await.unwrap();

        let params = ListParams {
            q: Some("FOO".to_string()),
            ..Default::default()
        };
        let page = store.list(&params.filter(), params.page()).await.unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn replace_keeps_created_at() {
        let store = MemoryStore::new();
        let original = store.create(TodoFields::with_title("a")).await.unwrap();

        let replaced = store
            .replace(original.id, TodoFields::with_title("b"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.created_at, original.created_at);
        assert!(replaced.updated_at >= original.updated_at);
        assert_eq!(replaced.title, "b");
    }

    #[tokio::test]
    async fn missing_ids_are_none() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(store.get(id).await.unwrap().is_none());
        assert!(store.replace(id, TodoFields::with_title("x")).await.unwrap().is_none());
        assert!(store.update(id, TodoPatch::default()).await.unwrap().is_none());
        assert!(store.delete(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_last_state() {
        let store = MemoryStore::new();
        let todo = store.create(TodoFields::with_title("gone")).await.unwrap();
        assert_eq!(store.delete(todo.id).await.unwrap(), Some(todo.clone()));
        assert!(store.is_empty().await);
        assert!(store.delete(todo.id).await.unwrap().is_none());
    }
}
