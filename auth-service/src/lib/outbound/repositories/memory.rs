use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Used when no database URL is configured and by the integration tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn username_taken(users: &HashMap<UserId, User>, candidate: &User) -> bool {
    users
        .values()
        .any(|u| u.id != candidate.id && u.username == candidate.username)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if username_taken(&users, &user) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if username_taken(&users, &user) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordCredential;
    use chrono::Duration;
    use chrono::Utc;

    use super::*;

    fn user(username: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            credential: PasswordCredential::new("ab".repeat(64), "cd".repeat(32)),
            admin: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let alice = repository.create(user("alice")).await.unwrap();

        let by_id = repository.find_by_id(&alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.username.as_str(), "alice");

        let by_name = repository
            .find_by_username(&alice.username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, alice.id);
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("alice")).await.unwrap();

        let result = repository.create(user("alice")).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_update_to_taken_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("alice")).await.unwrap();
        let mut bob = repository.create(user("bob")).await.unwrap();

        bob.username = Username::new("alice".to_string()).unwrap();
        let result = repository.update(bob).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_own_username() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository.create(user("alice")).await.unwrap();

        alice.admin = true;
        let updated = repository.update(alice).await.unwrap();
        assert!(updated.admin);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repository = InMemoryUserRepository::new();
        let result = repository.update(user("ghost")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_all_oldest_first() {
        let repository = InMemoryUserRepository::new();
        let mut older = user("older");
        older.created_at = Utc::now() - Duration::minutes(5);
        repository.create(user("newer")).await.unwrap();
        repository.create(older).await.unwrap();

        let names: Vec<String> = repository
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username.to_string())
            .collect();
        assert_eq!(names, vec!["older", "newer"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repository = InMemoryUserRepository::new();
        let alice = repository.create(user("alice")).await.unwrap();

        repository.delete(&alice.id).await.unwrap();
        assert!(repository.find_by_id(&alice.id).await.unwrap().is_none());
        assert!(matches!(
            repository.delete(&alice.id).await,
            Err(UserError::NotFound(_))
        ));
    }
}
