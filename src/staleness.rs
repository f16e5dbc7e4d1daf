//! Data staleness disclosure.
//!
//! The index behind the dashboard is refilled by a batch pipeline, so every
//! data view states the refresh cadence instead of implying live data. This
//! is a fixed annotation, not a countdown. When the data service reports the
//! newest record time, that is shown alongside the cadence.

use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::config::CONFIG;
use crate::views::html::html_escape;

/// Nominal refresh cadence of the ingestion pipeline
pub const DEFAULT_REFRESH_CADENCE: Duration = Duration::from_secs(20 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessIndicator {
    cadence: Duration,
}

impl Default for StalenessIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_CADENCE)
    }
}

impl StalenessIndicator {
    pub const fn new(cadence: Duration) -> Self {
        Self { cadence }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn cadence_minutes(&self) -> u64 {
        (self.cadence.as_secs() + 59) / 60
    }

    /// "Data is refreshed roughly every 20 minutes"
    pub fn disclosure(&self) -> String {
        format!("Data is refreshed roughly every {}", self.cadence_text())
    }

    pub fn disclosure_with_snapshot(&self, taken_at: Option<DateTime<Utc>>) -> String {
        match taken_at {
            Some(at) => format!(
                "{} (last snapshot {} UTC)",
                self.disclosure(),
                at.format("%Y-%m-%d %H:%M")
            ),
            None => self.disclosure(),
        }
    }

    /// Banner placed at the top of every data view
    pub fn render_banner(&self, taken_at: Option<DateTime<Utc>>) -> String {
        format!(
            r#"<p class="text-xs text-gray-500" data-staleness="{}">{}</p>"#,
            self.cadence_minutes(),
            html_escape(&self.disclosure_with_snapshot(taken_at))
        )
    }

    fn cadence_text(&self) -> String {
        let secs = self.cadence.as_secs();
        if secs < 60 {
            return plural(secs, "second");
        }
        let minutes = self.cadence_minutes();
        if minutes % 60 == 0 {
            plural(minutes / 60, "hour")
        } else {
            plural(minutes, "minute")
        }
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Process-wide indicator, fixed at startup
pub static STALENESS: Lazy<StalenessIndicator> =
    Lazy::new(|| StalenessIndicator::new(CONFIG.refresh_cadence));
