//! In-process host implementing every capability port.
//!
//! Backs the handler tests and the headless agent binary. Individual
//! operations can be made to fail with [`MemoryHost::fail`].

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_client::NotificationRecord;

use crate::AgentError;
use crate::normalize::DisplayDescriptor;
use crate::ports::{
    AppBadge, NotificationHandle, NotificationPlatform, Permission, PermissionSource,
    RemoteState, ShownNotification, WindowManager,
};
use crate::window::{WindowClient, WindowMessage, redirect_target};

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Show,
    Query,
    Close,
    Badge,
    Windows,
    Focus,
    Navigate,
    PostMessage,
    OpenWindow,
    Fetch,
    Patch,
}

/// Window-side effect recorded by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    Focused(String),
    Navigated { window: String, url: String },
    Messaged { window: String, message: WindowMessage },
    Opened(String),
}

#[derive(Debug, Clone)]
struct TrayEntry {
    notification: ShownNotification,
    shown_at: DateTime<Utc>,
}

#[derive(Debug)]
struct HostState {
    permission: Permission,
    max_actions: usize,
    next_handle: u64,
    tray: Vec<TrayEntry>,
    badge: Option<usize>,
    windows: Vec<WindowClient>,
    next_window: u64,
    window_events: Vec<WindowEvent>,
    faults: HashSet<Fault>,
}

/// Notification tray, badge, permission and windows kept in memory.
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Permission granted, two action buttons, no windows.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                permission: Permission::Granted,
                max_actions: 2,
                next_handle: 1,
                tray: Vec::new(),
                badge: None,
                windows: Vec::new(),
                next_window: 1,
                window_events: Vec::new(),
                faults: HashSet::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, fault: Fault) -> Result<(), AgentError> {
        if !self.lock().faults.contains(&fault) {
            return Ok(());
        }
        let message = format!("{fault:?} failed");
        Err(match fault {
            Fault::Windows | Fault::Focus | Fault::Navigate | Fault::PostMessage | Fault::OpenWindow => {
                AgentError::Window(message)
            }
            _ => AgentError::Platform(message),
        })
    }

    pub fn fail(&self, fault: Fault) {
        self.lock().faults.insert(fault);
    }

    pub fn heal(&self, fault: Fault) {
        self.lock().faults.remove(&fault);
    }

    pub fn set_permission(&self, permission: Permission) {
        self.lock().permission = permission;
    }

    pub fn set_max_actions(&self, max_actions: usize) {
        self.lock().max_actions = max_actions;
    }

    /// Outstanding notifications, oldest first.
    pub fn shown(&self) -> Vec<ShownNotification> {
        let mut tray = self.lock().tray.clone();
        tray.sort_by_key(|entry| (entry.shown_at, entry.notification.handle));
        tray.into_iter().map(|entry| entry.notification).collect()
    }

    pub fn find_by_correlation(&self, notification_id: &str) -> Option<ShownNotification> {
        self.shown()
            .into_iter()
            .find(|n| n.correlation_id() == Some(notification_id))
    }

    pub fn badge_value(&self) -> Option<usize> {
        self.lock().badge
    }

    pub fn set_badge_value(&self, value: Option<usize>) {
        self.lock().badge = value;
    }

    /// Register an open window and return its id.
    pub fn add_window(&self, url: &str, navigable: bool) -> String {
        let mut state = self.lock();
        let id = state.next_window.to_string();
        state.next_window += 1;
        state.windows.push(WindowClient {
            id: id.clone(),
            url: url.into(),
            navigable,
        });
        id
    }

    pub fn window_url(&self, id: &str) -> Option<String> {
        self.lock()
            .windows
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.url.clone())
    }

    pub fn window_events(&self) -> Vec<WindowEvent> {
        self.lock().window_events.clone()
    }
}

#[async_trait]
impl PermissionSource for MemoryHost {
    async fn permission(&self) -> Permission {
        self.lock().permission
    }
}

#[async_trait]
impl NotificationPlatform for MemoryHost {
    fn max_actions(&self) -> usize {
        self.lock().max_actions
    }

    async fn show(&self, descriptor: &DisplayDescriptor) -> Result<NotificationHandle, AgentError> {
        self.check(Fault::Show)?;
        let mut state = self.lock();
        let handle = NotificationHandle(state.next_handle);
        state.next_handle += 1;

        // A tagged notification replaces the outstanding one with the same tag.
        if let Some(tag) = descriptor.options.tag.as_deref() {
            state
                .tray
                .retain(|entry| entry.notification.options.tag.as_deref() != Some(tag));
        }
        state.tray.push(TrayEntry {
            notification: ShownNotification {
                handle,
                title: descriptor.title.clone(),
                options: descriptor.options.clone(),
            },
            shown_at: Utc::now(),
        });
        tracing::info!(handle = handle.0, title = %descriptor.title, "Notification shown");
        Ok(handle)
    }

    async fn notifications(&self) -> Result<Vec<ShownNotification>, AgentError> {
        self.check(Fault::Query)?;
        Ok(self.shown())
    }

    async fn close(&self, handle: NotificationHandle) -> Result<(), AgentError> {
        self.check(Fault::Close)?;
        let mut state = self.lock();
        let before = state.tray.len();
        state.tray.retain(|entry| entry.notification.handle != handle);
        if state.tray.len() < before {
            tracing::info!(handle = handle.0, "Notification closed");
        }
        Ok(())
    }
}

#[async_trait]
impl AppBadge for MemoryHost {
    async fn set(&self, count: usize) -> Result<(), AgentError> {
        self.check(Fault::Badge)?;
        self.lock().badge = Some(count);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AgentError> {
        self.check(Fault::Badge)?;
        self.lock().badge = None;
        Ok(())
    }
}

#[async_trait]
impl WindowManager for MemoryHost {
    async fn windows(&self) -> Result<Vec<WindowClient>, AgentError> {
        self.check(Fault::Windows)?;
        Ok(self.lock().windows.clone())
    }

    async fn focus(&self, window: &WindowClient) -> Result<(), AgentError> {
        self.check(Fault::Focus)?;
        self.lock()
            .window_events
            .push(WindowEvent::Focused(window.id.clone()));
        Ok(())
    }

    async fn navigate(&self, window: &WindowClient, url: &str) -> Result<(), AgentError> {
        self.check(Fault::Navigate)?;
        if !window.navigable {
            return Err(AgentError::Window(format!(
                "window {} cannot be navigated",
                window.id
            )));
        }
        let mut state = self.lock();
        if let Some(w) = state.windows.iter_mut().find(|w| w.id == window.id) {
            w.url = url.into();
        }
        state.window_events.push(WindowEvent::Navigated {
            window: window.id.clone(),
            url: url.into(),
        });
        Ok(())
    }

    async fn post_message(
        &self,
        window: &WindowClient,
        message: &WindowMessage,
    ) -> Result<(), AgentError> {
        self.check(Fault::PostMessage)?;
        let mut state = self.lock();
        if let Some(w) = state.windows.iter_mut().find(|w| w.id == window.id) {
            if let Some(target) = redirect_target(message, &w.url) {
                w.url = target.into();
            }
        }
        state.window_events.push(WindowEvent::Messaged {
            window: window.id.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), AgentError> {
        self.check(Fault::OpenWindow)?;
        let mut state = self.lock();
        let id = state.next_window.to_string();
        state.next_window += 1;
        state.windows.push(WindowClient {
            id,
            url: url.into(),
            navigable: true,
        });
        state.window_events.push(WindowEvent::Opened(url.into()));
        Ok(())
    }
}

/// Portal notification records kept in memory, with a log of every
/// state change applied.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    records: Mutex<HashMap<String, NotificationRecord>>,
    patches: Mutex<Vec<(String, String)>>,
    faults: Mutex<HashSet<Fault>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: NotificationRecord) {
        let mut records = self.records.lock().unwrap_or_else(|p| p.into_inner());
        records.insert(record.id.clone(), record);
    }

    /// Applied `(notification_id, action)` pairs in order.
    pub fn patches(&self) -> Vec<(String, String)> {
        self.patches.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn fail(&self, fault: Fault) {
        self.faults.lock().unwrap_or_else(|p| p.into_inner()).insert(fault);
    }

    fn faulty(&self, fault: Fault) -> bool {
        self.faults
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(&fault)
    }
}

#[async_trait]
impl RemoteState for MemoryRemote {
    async fn fetch_record(
        &self,
        notification_id: &str,
    ) -> Result<Option<NotificationRecord>, AgentError> {
        if self.faulty(Fault::Fetch) {
            return Err(AgentError::Platform("fetch failed".into()));
        }
        let records = self.records.lock().unwrap_or_else(|p| p.into_inner());
        Ok(records.get(notification_id).cloned())
    }

    async fn patch_state(&self, notification_id: &str, action: &str) -> Result<(), AgentError> {
        if self.faulty(Fault::Patch) {
            return Err(AgentError::Platform(format!("patch {action} failed")));
        }
        self.patches
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((notification_id.into(), action.into()));
        Ok(())
    }
}
