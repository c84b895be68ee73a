//! Sample users for development and demos.

use common::AppResult;
use domain::NewUser;

use super::UserRepository;

/// The three sample accounts. They carry no password and cannot log in.
pub fn sample_users() -> Vec<NewUser> {
    vec![
        NewUser::new("John Doe", "john@example.com", "")
            .with_phone("+1-555-0101")
            .with_address(Some("123 Main St, New York, NY 10001".to_string())),
        NewUser::new("Jane Smith", "jane@example.com", "")
            .with_phone("+1-555-0102")
            .with_address(Some("456 Oak Ave, Los Angeles, CA 90210".to_string())),
        NewUser::new("Bob Johnson", "bob@example.com", "").with_phone("+1-555-0103"),
    ]
}

/// Insert the sample users when the store has no live users.
///
/// Returns how many users were inserted.
pub async fn seed_if_empty(repo: &dyn UserRepository) -> AppResult<usize> {
    if repo.count().await? > 0 {
        tracing::info!("Data already exists, skipping seed");
        return Ok(0);
    }

    let users = sample_users();
    let total = users.len();
    for user in users {
        repo.create(user).await?;
    }

    tracing::info!(count = total, "Seeded sample users");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryUserStore;

    #[tokio::test]
    async fn test_seed_empty_store() {
        let store = MemoryUserStore::new();
        assert_eq!(seed_if_empty(&store).await.unwrap(), 3);
        assert_eq!(store.count().await.unwrap(), 3);

        let bob = store.find_by_email("bob@example.com").await.unwrap().unwrap();
        assert!(bob.address.is_none());
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let store = MemoryUserStore::with_sample_data();
        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
