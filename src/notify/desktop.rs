//! Desktop notification reporter
//!
//! Keeps a single progress notification that is updated in place where the
//! notification server supports it (Linux), and raises a separate critical
//! notification for every failure. If the notification server cannot be
//! reached, the reporter stops trying and falls back to logging.

use std::cell::{Cell, RefCell};
use std::time::Duration;

#[cfg(target_os = "linux")]
use notify_rust::{NotificationHandle, Timeout, Urgency};
use notify_rust::Notification;

use super::ProgressReporter;
use crate::error::{BackupError, BackupResult};

/// Reporter backed by desktop notifications
pub struct DesktopReporter {
    app_name: String,
    step_delay: Duration,
    title: RefCell<String>,
    unavailable: Cell<bool>,
    #[cfg(target_os = "linux")]
    progress: RefCell<Option<NotificationHandle>>,
}

impl DesktopReporter {
    /// Create a reporter that pauses `step_delay` after each progress update
    pub fn new(app_name: impl Into<String>, step_delay: Duration) -> Self {
        Self {
            app_name: app_name.into(),
            step_delay,
            title: RefCell::new(String::new()),
            unavailable: Cell::new(false),
            #[cfg(target_os = "linux")]
            progress: RefCell::new(None),
        }
    }

    fn pause(&self) {
        if !self.step_delay.is_zero() {
            std::thread::sleep(self.step_delay);
        }
    }

    /// Stop using the notification server after its first failure
    fn mark_unavailable(&self, error: BackupError) {
        if !self.unavailable.replace(true) {
            tracing::warn!(error = %error, "desktop notifications unavailable, logging only");
        }
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.get()
    }

    fn show_progress(&self, body: &str) {
        if self.is_unavailable() {
            return;
        }
        if let Err(e) = self.try_show_progress(body) {
            self.mark_unavailable(e);
        }
    }

    #[cfg(target_os = "linux")]
    fn try_show_progress(&self, body: &str) -> BackupResult<()> {
        let title = self.title.borrow().clone();
        let mut progress = self.progress.borrow_mut();

        if let Some(handle) = progress.as_mut() {
            handle.summary(&title).body(body);
            return handle.update().map_err(notification_error);
        }

        let handle = Notification::new()
            .appname(&self.app_name)
            .summary(&title)
            .body(body)
            .timeout(Timeout::Never)
            .show()
            .map_err(notification_error)?;
        *progress = Some(handle);

        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn try_show_progress(&self, _body: &str) -> BackupResult<()> {
        Ok(())
    }

    fn show_once(&self, summary: &str, body: &str, critical: bool) {
        if self.is_unavailable() {
            return;
        }

        let mut notification = Notification::new();
        notification.appname(&self.app_name).summary(summary).body(body);
        set_urgency(&mut notification, critical);

        if let Err(e) = notification.show().map(drop).map_err(notification_error) {
            self.mark_unavailable(e);
        }
    }
}

fn notification_error(error: notify_rust::error::Error) -> BackupError {
    BackupError::Notification(error.to_string())
}

#[cfg(target_os = "linux")]
fn set_urgency(notification: &mut Notification, critical: bool) {
    if critical {
        notification.urgency(Urgency::Critical);
    }
}

#[cfg(not(target_os = "linux"))]
fn set_urgency(_notification: &mut Notification, _critical: bool) {}

impl ProgressReporter for DesktopReporter {
    fn begin(&self, title: &str) {
        tracing::info!("{}", title);
        *self.title.borrow_mut() = title.to_string();
        self.show_progress("");
        self.pause();
    }

    fn report(&self, status: &str, detail: &str) {
        tracing::debug!(status, detail, "progress");
        let body = if detail.is_empty() {
            status.to_string()
        } else {
            format!("{}\n{}", status, detail)
        };
        self.show_progress(&body);
        self.pause();
    }

    fn report_failure(&self, title: &str, message: &str) {
        tracing::warn!("{}: {}", title, message);
        self.show_once(title, message, true);
    }

    fn complete(&self, title: &str, status: &str) {
        tracing::info!("{} {}", title, status);
        *self.title.borrow_mut() = title.to_string();

        if cfg!(target_os = "linux") {
            self.show_progress(status);
        } else {
            self.show_once(title, status, false);
        }
        self.pause();
    }
}
