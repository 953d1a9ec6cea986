use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};
use cloudflare_exporter_config::WindowOffsets;

/// The time range every query of one collection cycle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CollectionWindow {
    /// The rolling window ending `offsets.end` before `now`, truncated to whole seconds.
    pub fn rolling(now: DateTime<Utc>, offsets: WindowOffsets) -> Self {
        let now = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let start = now - chrono::Duration::from_std(offsets.start).unwrap_or(chrono::Duration::minutes(20));
        let end = now - chrono::Duration::from_std(offsets.end).unwrap_or(chrono::Duration::minutes(5));
        Self { start, end }
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn rolling_window_uses_offsets() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:00:30.750Z")
            .unwrap()
            .with_timezone(&Utc);
        let window = CollectionWindow::rolling(now, WindowOffsets::default());
        assert_eq!(window.start_rfc3339(), "2024-03-01T11:40:30Z");
        assert_eq!(window.end_rfc3339(), "2024-03-01T11:55:30Z");
        assert!(window.start < window.end);

        let window = CollectionWindow::rolling(
            now,
            WindowOffsets {
                start: Duration::from_secs(3600),
                end: Duration::from_secs(60),
            },
        );
        assert_eq!(window.start_rfc3339(), "2024-03-01T11:00:30Z");
        assert_eq!(window.end_rfc3339(), "2024-03-01T11:59:30Z");
    }
}
