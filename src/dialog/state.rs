use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::UserId;
use tokio::sync::{Mutex, RwLock};

/// Which prompt, if any, the next plain text message answers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Idle,
    AwaitingUsername,
    AwaitingListOwner,
    /// List owner already collected
    AwaitingListName { owner: String },
    AwaitingRandomCount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    /// Normalized Letterboxd handle, kept across dialogs
    pub username: Option<String>,
    pub dialog: DialogState,
}

impl UserState {
    /// Drop any pending prompt, keeping the configured handle
    pub fn reset_dialog(&mut self) {
        self.dialog = DialogState::Idle;
    }
}

/// In-memory per-user state, lives as long as the process.
///
/// The map lock is only held to look up or insert an entry; each user's
/// state has its own mutex so a slow fetch for one user never blocks another.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<UserId, Arc<Mutex<UserState>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_create(&self, user: UserId) -> Arc<Mutex<UserState>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(state) = sessions.get(&user) {
                return state.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions.entry(user).or_default().clone()
    }

    /// Copy of a user's state, if the user has been seen
    #[cfg(test)]
    pub async fn snapshot(&self, user: UserId) -> Option<UserState> {
        let state = self.sessions.read().await.get(&user).cloned()?;
        let snapshot = state.lock().await.clone();
        Some(snapshot)
    }
}
