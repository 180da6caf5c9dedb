//! Notification channel between the wizard and the presentation layer.
//!
//! The wizard, the intake form and the simulator never draw anything
//! themselves; they emit [`Notification`]s through a [`Notifier`] and
//! whoever renders the session decides how to surface them.

use tokio::sync::mpsc;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    /// A recoverable problem the user has to act on.
    Destructive,
}

/// A short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Emitted when an intake submission is missing required fields.
    pub fn missing_required() -> Self {
        Self::destructive(
            "Campos obrigatórios",
            "Por favor, preencha todos os campos obrigatórios.",
        )
    }

    /// Emitted by the simulator when plan content has been produced.
    pub fn plan_generated() -> Self {
        Self::success(
            "PEI Gerado com Sucesso",
            "O Plano de Ensino Individualizado foi gerado com base nas informações fornecidas.",
        )
    }

    /// Emitted by the wizard when a plan is finalized.
    pub fn plan_finalized() -> Self {
        Self::success(
            "PEI Finalizado",
            "Seu Plano de Ensino Individualizado foi criado com sucesso!",
        )
    }
}

/// Sink for notifications.
///
/// Object safe so sessions can hold an `Arc<dyn Notifier>`.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

const _: () = {
    fn _assert_object_safe(_: &dyn Notifier) {}
};

/// Forwards notifications into an unbounded channel.
///
/// A closed receiver is not an error: the notification is dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier together with the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("notification receiver closed; dropping notification");
        }
    }
}

/// Writes notifications to the log. Used by headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            NotificationKind::Destructive => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}
