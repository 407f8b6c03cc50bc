use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::domain::{MonitoringStatus, ScanFrequency};

pub const MAX_PROGRESS: u8 = 100;

const INITIAL_LAST_SCAN_AGO_MINUTES: i64 = 2;
const INITIAL_NEXT_SCAN_IN_MINUTES: i64 = 58;
const NEXT_SCAN_AFTER_COMPLETION_MINUTES: i64 = 60;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cosmetic monitoring status. Nothing is actually scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoringState {
    pub status: MonitoringStatus,
    pub frequency: ScanFrequency,
    pub last_scan_time: DateTime<Utc>,
    pub next_scheduled_scan: DateTime<Utc>,
    /// 0-100, only meaningful while scanning.
    pub progress: u8,
}

impl MonitoringState {
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            status: MonitoringStatus::Active,
            frequency: ScanFrequency::default(),
            last_scan_time: now - Duration::minutes(INITIAL_LAST_SCAN_AGO_MINUTES),
            next_scheduled_scan: now + Duration::minutes(INITIAL_NEXT_SCAN_IN_MINUTES),
            progress: 0,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.status == MonitoringStatus::Scanning
    }

    /// Flips active and paused; a running scan is left alone.
    pub fn toggle(&mut self) {
        self.status = match self.status {
            MonitoringStatus::Active => MonitoringStatus::Paused,
            MonitoringStatus::Paused => MonitoringStatus::Active,
            MonitoringStatus::Scanning => MonitoringStatus::Scanning,
        };
    }

    pub fn start_scan(&mut self) {
        self.status = MonitoringStatus::Scanning;
        self.progress = 0;
    }

    pub fn complete_scan(&mut self, now: DateTime<Utc>) {
        self.status = MonitoringStatus::Active;
        self.progress = MAX_PROGRESS;
        self.last_scan_time = now;
        self.next_scheduled_scan = now + Duration::minutes(NEXT_SCAN_AFTER_COMPLETION_MINUTES);
    }

    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(MAX_PROGRESS);
    }
}

/// Short relative rendering used by status displays: "3m ago", "2h", "just now".
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - at;
    let is_future = diff < Duration::zero();
    let minutes = diff.num_minutes().abs();

    if minutes < 1 {
        return if is_future { "now" } else { "just now" }.to_string();
    }

    let (value, unit) = if minutes < 60 {
        (minutes, "m")
    } else if minutes / 60 < 24 {
        (minutes / 60, "h")
    } else {
        (minutes / 60 / 24, "d")
    };

    if is_future {
        format!("{value}{unit}")
    } else {
        format!("{value}{unit} ago")
    }
}

#[cfg(test)]
#[path = "tests/monitoring_tests.rs"]
mod tests;
