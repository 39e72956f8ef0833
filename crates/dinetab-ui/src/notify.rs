//! # Toast Notifications
//!
//! Short-lived messages stacked in a corner of the page.
//!
//! ## Toast Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         One Toast                                       │
//! │                                                                         │
//! │   show_*()                                                              │
//! │      │  Inserted   (in the stack, hidden: lets the CSS transition run)  │
//! │      ▼                                                                  │
//! │   +10 ms                                                                │
//! │      │  Shown      ("show" class on)                                    │
//! │      ▼                                                                  │
//! │   +duration (default 3000 ms)                                           │
//! │      │  Hidden     ("show" class off, fade-out starts)                  │
//! │      ▼                                                                  │
//! │   +300 ms                                                               │
//! │      │  Removed    (gone from the stack)                                │
//! │      ▼                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each toast runs on its own spawned task, so `show_*` must be called from
//! inside a Tokio runtime. Renderers either poll [`ToastCenter::toasts`] or
//! follow [`ToastCenter::subscribe`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::icons::{self, IconOptions};
use crate::markup::escape_html;

/// Visible time when none is configured.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Delay between insertion and the `show` class.
pub const SHOW_DELAY: Duration = Duration::from_millis(10);

/// Fade-out time between hiding and removal.
pub const REMOVE_DELAY: Duration = Duration::from_millis(300);

const EVENT_CAPACITY: usize = 64;

// =============================================================================
// Toast
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Info => "info",
            ToastKind::Error => "error",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "check",
            ToastKind::Info => "info",
            ToastKind::Error => "x",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    /// Whether the `show` class is on.
    pub visible: bool,
}

impl Toast {
    /// `<div class="toast toast-success show">…<span>message</span></div>`
    pub fn to_html(&self) -> String {
        let icon = icons::render(self.kind.icon(), &IconOptions::default().size(24));
        format!(
            r#"<div class="toast toast-{}{}">{}<span>{}</span></div>"#,
            self.kind.as_str(),
            if self.visible { " show" } else { "" },
            icon,
            escape_html(&self.message)
        )
    }
}

/// Lifecycle transitions, in order, for one toast id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "id", rename_all = "lowercase")]
pub enum ToastEvent {
    Inserted(Uuid),
    Shown(Uuid),
    Hidden(Uuid),
    Removed(Uuid),
}

impl ToastEvent {
    pub fn id(&self) -> Uuid {
        match self {
            ToastEvent::Inserted(id)
            | ToastEvent::Shown(id)
            | ToastEvent::Hidden(id)
            | ToastEvent::Removed(id) => *id,
        }
    }
}

// =============================================================================
// Toast Center
// =============================================================================

/// The page's toast stack.
///
/// Cloning gives another handle to the same stack.
#[derive(Debug, Clone)]
pub struct ToastCenter {
    stack: Arc<Mutex<Vec<Toast>>>,
    events: broadcast::Sender<ToastEvent>,
    duration: Duration,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_TOAST_DURATION)
    }

    /// Stack whose toasts stay visible for `duration`.
    pub fn with_duration(duration: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        ToastCenter {
            stack: Arc::new(Mutex::new(Vec::new())),
            events,
            duration,
        }
    }

    pub fn show_success(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Success, message, self.duration)
    }

    pub fn show_info(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Info, message, self.duration)
    }

    pub fn show_error(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Error, message, self.duration)
    }

    /// Inserts a toast and schedules its show, hide and removal.
    pub fn show(&self, kind: ToastKind, message: impl Into<String>, duration: Duration) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            visible: false,
        };
        let id = toast.id;
        debug!(%id, kind = kind.as_str(), "Toast");

        self.lock().push(toast);
        let _ = self.events.send(ToastEvent::Inserted(id));

        let center = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SHOW_DELAY).await;
            center.set_visible(id, true);
            let _ = center.events.send(ToastEvent::Shown(id));

            tokio::time::sleep(duration).await;
            center.set_visible(id, false);
            let _ = center.events.send(ToastEvent::Hidden(id));

            tokio::time::sleep(REMOVE_DELAY).await;
            center.lock().retain(|t| t.id != id);
            let _ = center.events.send(ToastEvent::Removed(id));
        });
        id
    }

    /// Current stack, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    /// Lifecycle events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.events.subscribe()
    }

    /// The whole stack as HTML, oldest first.
    pub fn to_html(&self) -> String {
        self.lock().iter().map(Toast::to_html).collect()
    }

    fn set_visible(&self, id: Uuid, visible: bool) {
        if let Some(toast) = self.lock().iter_mut().find(|t| t.id == id) {
            toast.visible = visible;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        // plain data, safe to keep using after a poisoned lock
        self.stack.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
