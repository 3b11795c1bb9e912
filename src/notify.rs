use serde::Serialize;

use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyKind {
    Success,
    Error,
    Warning,
    Confirm,
}

/// User-facing alert sink. `Confirm` returns the user's answer; every other kind
/// returns `true`.
pub trait Notifier {
    fn notify(&self, kind: NotifyKind, title: &str, message: &str) -> bool;

    fn show(&self, notice: &Notice) -> bool {
        self.notify(notice.kind, &notice.title, &notice.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NotifyKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(kind: NotifyKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn added() -> Self {
        Self::new(NotifyKind::Success, "Added!", "Task has been added.")
    }

    pub fn updated() -> Self {
        Self::new(NotifyKind::Success, "Updated!", "Task has been updated.")
    }

    pub fn deleted() -> Self {
        Self::new(NotifyKind::Success, "Deleted!", "Task has been deleted.")
    }

    pub fn status_changed(completed: bool) -> Self {
        let status = if completed { "completed" } else { "pending" };
        Self::new(
            NotifyKind::Success,
            "Updated!",
            format!("Task marked as {status}."),
        )
    }

    pub fn confirm_delete() -> Self {
        Self::new(
            NotifyKind::Confirm,
            "Are you sure?",
            "You won't be able to revert this!",
        )
    }

    pub fn save_failed() -> Self {
        Self::new(
            NotifyKind::Error,
            "Error",
            "An error occurred while saving the task.",
        )
    }

    pub fn update_failed() -> Self {
        Self::new(
            NotifyKind::Error,
            "Error",
            "An error occurred while updating the task.",
        )
    }

    pub fn delete_failed() -> Self {
        Self::new(
            NotifyKind::Error,
            "Error",
            "An error occurred while deleting the task.",
        )
    }

    pub fn invalid(error: &ValidationError) -> Self {
        Self::new(NotifyKind::Error, "Error", error.to_string())
    }

    pub fn load_failed(message: &str) -> Self {
        Self::new(NotifyKind::Warning, "Error loading tasks", message)
    }

    pub fn login_failed(message: &str) -> Self {
        Self::new(NotifyKind::Error, "Login failed", message)
    }
}

/// Sends notices to the log. Confirmations are declined since nobody can answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotifyKind, title: &str, message: &str) -> bool {
        match kind {
            NotifyKind::Success => log::info!("{title} {message}"),
            NotifyKind::Warning => log::warn!("{title} {message}"),
            NotifyKind::Error => log::error!("{title} {message}"),
            NotifyKind::Confirm => {
                log::warn!("confirmation declined: {title} {message}");
                return false;
            }
        }
        true
    }
}
