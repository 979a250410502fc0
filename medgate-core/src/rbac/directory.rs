//! In-memory user directory

use super::context::UserRecord;
use super::traits::UserDirectory;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// User directory held in process memory
///
/// Role assignments can be changed at runtime with [`assign_role`]; the
/// next request from that user sees the new role.
///
/// [`assign_role`]: MemoryUserDirectory::assign_role
#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = users.into_iter().map(|user| (user.id.clone(), user)).collect();
        Self { users: Arc::new(RwLock::new(users)) }
    }

    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Change a user's role; returns false if the user does not exist
    pub async fn assign_role(&self, id: &str, role: impl Into<String>) -> bool {
        match self.users.write().await.get_mut(id) {
            Some(user) => {
                user.role = role.into();
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: &str) -> Option<UserRecord> {
        self.users.write().await.remove(id)
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(id).cloned())
    }
}
