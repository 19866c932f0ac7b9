use std::sync::Mutex;
use time::OffsetDateTime;

/// A local notification to be delivered at `fire_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: OffsetDateTime,
}

/// Generate a notification identifier: `nag_<ulid>`.
pub fn new_notification_id() -> String {
    format!("nag_{}", ulid::Ulid::new().to_string().to_lowercase())
}

/// Platform notification API. Scheduling and cancellation are fire-and-forget;
/// callers log failures and move on.
pub trait NotificationCenter: Send + Sync {
    fn schedule(&self, request: &NotificationRequest) -> anyhow::Result<()>;

    fn cancel(&self, ids: &[String]) -> anyhow::Result<()>;

    /// Identifiers still waiting to be delivered.
    fn pending(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Keeps scheduled requests in memory (for testing).
pub struct CollectNotifier {
    requests: Mutex<Vec<NotificationRequest>>,
    fail_schedule: bool,
}

impl CollectNotifier {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_schedule: false,
        }
    }

    /// A center whose `schedule` always fails, like one without permission.
    pub fn denied() -> Self {
        Self {
            fail_schedule: true,
            ..Self::new()
        }
    }

    /// Requests currently scheduled, in scheduling order.
    pub fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for CollectNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter for CollectNotifier {
    fn schedule(&self, request: &NotificationRequest) -> anyhow::Result<()> {
        if self.fail_schedule {
            anyhow::bail!("notification permission not granted");
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    fn cancel(&self, ids: &[String]) -> anyhow::Result<()> {
        self.requests
            .lock()
            .unwrap()
            .retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    fn pending(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn request(id: &str) -> NotificationRequest {
        NotificationRequest {
            id: id.to_string(),
            title: "t".into(),
            body: "b".into(),
            fire_at: datetime!(2026-03-02 19:00 UTC),
        }
    }

    #[test]
    fn ids_are_unique_and_prefixed() {
        let a = new_notification_id();
        let b = new_notification_id();
        assert!(a.starts_with("nag_"));
        assert_ne!(a, b);
    }

    #[test]
    fn collect_schedule_and_cancel() {
        let center = CollectNotifier::new();
        center.schedule(&request("a")).unwrap();
        center.schedule(&request("b")).unwrap();
        center.schedule(&request("c")).unwrap();
        center.cancel(&["b".to_string()]).unwrap();
        assert_eq!(center.pending(), vec!["a", "c"]);
    }

    #[test]
    fn denied_center_rejects() {
        let center = CollectNotifier::denied();
        assert!(center.schedule(&request("a")).is_err());
        assert!(center.requests().is_empty());
    }
}
