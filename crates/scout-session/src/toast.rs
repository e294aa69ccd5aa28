//! Transient notices that remove themselves after a fixed lifetime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use uuid::Uuid;

/// How long a notice stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
}

/// Visible notices, oldest first.
///
/// Each notice owns its own expiry timer and is removed by id, so expiring
/// one never affects another, even with an identical message.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
    ttl: Duration,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            ttl: TOAST_TTL,
        }
    }

    /// Show a notice and schedule its removal after the TTL.
    ///
    /// Outside a Tokio runtime the notice is shown but never expires.
    pub fn push(&self, message: impl Into<String>, kind: ToastKind) -> Toast {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
        };
        lock(&self.toasts).push(toast.clone());

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let toasts = Arc::clone(&self.toasts);
                let ttl = self.ttl;
                let id = toast.id;
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    lock(&toasts).retain(|t| t.id != id);
                });
            }
            Err(_) => {
                tracing::warn!(id = %toast.id, "no async runtime; toast will not expire");
            }
        }

        toast
    }

    /// Remove a notice early. Returns `false` if it had already expired.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = lock(&self.toasts);
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.toasts).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.toasts).is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(toasts: &Mutex<Vec<Toast>>) -> MutexGuard<'_, Vec<Toast>> {
    toasts.lock().unwrap_or_else(PoisonError::into_inner)
}
