use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// How long a toast of this kind stays up when no duration is given.
    pub fn default_duration(&self) -> Duration {
        match self {
            NotificationKind::Success | NotificationKind::Info => Duration::from_millis(3000),
            NotificationKind::Warning => Duration::from_millis(4000),
            NotificationKind::Error => Duration::from_millis(5000),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        };
        f.write_str(label)
    }
}

/// A transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Zero means the notification never expires on its own.
    pub expires_after: Duration,
}

impl Notification {
    pub fn is_sticky(&self) -> bool {
        self.expires_after.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        assert_eq!(NotificationKind::Success.default_duration().as_millis(), 3000);
        assert_eq!(NotificationKind::Error.default_duration().as_millis(), 5000);
        assert_eq!(NotificationKind::Warning.default_duration().as_millis(), 4000);
        assert_eq!(NotificationKind::Info.default_duration().as_millis(), 3000);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(NotificationKind::Warning).unwrap(), "warning");
        assert_eq!(NotificationKind::Error.to_string(), "error");
    }
}
