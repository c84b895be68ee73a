//! In-memory user repository.
//!
//! A single `RwLock` guards the whole table. Every operation holds it for
//! its entire body, so the email check in `create`/`update` and the write
//! that follows cannot interleave with another writer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, User, MSG_EMAIL_TAKEN, MSG_USER_NOT_FOUND};

use super::seed::sample_users;
use super::UserRepository;

#[derive(Debug)]
struct Table {
    /// Live and soft-deleted rows, keyed by id
    rows: BTreeMap<i64, User>,
    next_id: i64,
}

impl Table {
    fn empty() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn seeded() -> Self {
        let mut table = Self::empty();
        let now = Utc::now();
        for new_user in sample_users() {
            let id = table.next_id;
            table.rows.insert(id, new_user.into_user(id, now));
            table.next_id += 1;
        }
        table
    }

    fn live(&self) -> impl Iterator<Item = &User> {
        self.rows.values().filter(|u| !u.is_deleted())
    }

    fn email_taken_by_other(&self, email: &str, id: Option<i64>) -> bool {
        self.live().any(|u| u.email == email && Some(u.id) != id)
    }

    fn live_mut(&mut self, id: i64) -> Option<&mut User> {
        self.rows.get_mut(&id).filter(|u| !u.is_deleted())
    }
}

/// Repository backed by a process-local map.
#[derive(Debug)]
pub struct MemoryUserStore {
    table: RwLock<Table>,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    /// Empty store; the first id handed out is 1.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::empty()),
        }
    }

    /// Store pre-populated with the three sample users (ids 1..=3).
    pub fn with_sample_data() -> Self {
        Self {
            table: RwLock::new(Table::seeded()),
        }
    }

    /// Discard every change and restore the sample data.
    pub async fn reset(&self) {
        *self.table.write().await = Table::seeded();
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.live().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        let user = table.live().find(|u| u.email == email).cloned();
        Ok(user)
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        let user = table
            .live()
            .find(|u| u.password_reset_token.as_deref() == Some(token))
            .cloned();
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut table = self.table.write().await;

        if table.email_taken_by_other(&new_user.email, None) {
            return Err(AppError::conflict(MSG_EMAIL_TAKEN));
        }

        let id = table.next_id;
        table.next_id += 1;

        let user = new_user.into_user(id, Utc::now());
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut table = self.table.write().await;

        if table.live_mut(user.id).is_none() {
            return Err(AppError::not_found(MSG_USER_NOT_FOUND));
        }
        if table.email_taken_by_other(&user.email, Some(user.id)) {
            return Err(AppError::conflict(MSG_EMAIL_TAKEN));
        }

        let stored = table.live_mut(user.id).ok_or_not_found()?;
        let created_at = stored.created_at;
        let previous_updated_at = stored.updated_at;

        *stored = User {
            created_at,
            updated_at: previous_updated_at,
            deleted_at: None,
            ..user.clone()
        };
        stored.touch();

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut table = self.table.write().await;
        let stored = table.live_mut(id).ok_or_not_found()?;
        stored.soft_delete();
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let table = self.table.read().await;
        Ok(table.live().count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser::new(name, email, "").with_phone("+1-555-0100")
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryUserStore::new();

        let a = store.create(new_user("A", "a@example.com")).await.unwrap();
        let b = store.create(new_user("B", "b@example.com")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let store = MemoryUserStore::new();
        let input = new_user("Alice", "alice@example.com").with_address(Some("1 Road".into()));

        let created = store.create(input.clone()).await.unwrap();
        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.email, input.email);
        assert_eq!(fetched.phone, input.phone);
        assert_eq!(fetched.address, input.address);
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("A", "dup@example.com")).await.unwrap();

        let err = store.create(new_user("B", "dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == MSG_EMAIL_TAKEN));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_preserves_created_at_and_advances_updated_at() {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("A", "a@example.com")).await.unwrap();

        let mut changed = created.clone();
        changed.name = "Renamed".into();
        changed.created_at = created.created_at - Duration::days(3);

        let updated = store.update(&changed).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_email_collision() {
        let store = MemoryUserStore::new();
        store.create(new_user("A", "a@example.com")).await.unwrap();
        let b = store.create(new_user("B", "b@example.com")).await.unwrap();

        let mut changed = b.clone();
        changed.email = "a@example.com".into();
        let err = store.update(&changed).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Keeping your own email is not a collision
        assert!(store.update(&b).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryUserStore::new();
        let ghost = new_user("Ghost", "ghost@example.com").into_user(42, Utc::now());

        let err = store.update(&ghost).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_record() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("A", "a@example.com")).await.unwrap();
        let b = store.create(new_user("B", "b@example.com")).await.unwrap();

        store.delete(a.id).await.unwrap();

        assert!(store.find_by_id(a.id).await.unwrap().is_none());
        assert!(store.find_by_email("a@example.com").await.unwrap().is_none());
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b.id]);
        assert_eq!(store.count().await.unwrap(), 1);

        let err = store.delete(a.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let mut revived = a.clone();
        revived.name = "Back".into();
        assert!(matches!(
            store.update(&revived).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_deleted_email_can_be_reused_without_reusing_id() {
        let store = MemoryUserStore::new();
        let first = store.create(new_user("A", "a@example.com")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(new_user("A2", "a@example.com")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_by_email_matches_exactly() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("A", "a@example.com")).await.unwrap();
        store.create(new_user("B", "b@example.com")).await.unwrap();

        let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found, a);
        assert!(store.find_by_email("c@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_reset_token_ignores_expiry() {
        let store = MemoryUserStore::new();
        let mut user = store.create(new_user("A", "a@example.com")).await.unwrap();
        user.set_reset_token("tok".into(), Utc::now() - Duration::hours(1));
        store.update(&user).await.unwrap();

        let found = store.find_by_reset_token("tok").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.find_by_reset_token("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sample_data_and_reset() {
        let store = MemoryUserStore::with_sample_data();
        assert_eq!(store.count().await.unwrap(), 3);
        let john = store.find_by_email("john@example.com").await.unwrap().unwrap();
        assert_eq!(john.id, 1);

        store.delete(john.id).await.unwrap();
        let next = store.create(new_user("D", "d@example.com")).await.unwrap();
        assert_eq!(next.id, 4);

        store.reset().await;
        assert_eq!(store.count().await.unwrap(), 3);
        assert!(store.find_by_email("d@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(1).await.unwrap().is_some());
    }
}
