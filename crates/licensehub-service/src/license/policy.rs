//! Pure license policy functions.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use licensehub_entity::license::LicenseStatus;

/// The instant a license with this expire date stops being usable:
/// midnight UTC at the start of that day.
pub fn expiry_instant(expire: NaiveDate) -> DateTime<Utc> {
    expire.and_time(NaiveTime::MIN).and_utc()
}

/// Effective status at `now`.
///
/// `Expired` is sticky: once stored it is returned regardless of the date.
pub fn derive_status(
    stored: LicenseStatus,
    expire: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> LicenseStatus {
    match (stored, expire) {
        (LicenseStatus::Expired, _) => LicenseStatus::Expired,
        (_, Some(date)) if now > expiry_instant(date) => LicenseStatus::Expired,
        (status, _) => status,
    }
}

/// Whether the license is still "online" from its last heartbeat.
pub fn is_within_heartbeat_window(
    last_online: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    last_online.is_some_and(|last| now - last <= window)
}

/// Containers exempt from the online-exclusivity check.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    containers: HashSet<String>,
}

impl AdminAllowList {
    /// Build from container ids; blank entries are ignored.
    pub fn new<I, S>(containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            containers: containers
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Whether `container_id` is allow-listed.
    pub fn contains(&self, container_id: &str) -> bool {
        self.containers.contains(container_id)
    }

    /// Number of allow-listed containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
