//! Event segmentation for Trailcam
//!
//! A camera visit produces a burst of photos close together in time. This
//! module sorts the photos of a folder by capture time and cuts the stream
//! wherever the gap to the previous photo exceeds the configured threshold.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::TimestampedRecord;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GroupingError {
    #[error("cannot segment an empty record set")]
    NoRecords,
    #[error("an event must contain at least one record")]
    EmptyEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Maximum gap between consecutive photos of the same event (seconds)
    pub max_gap_secs: i64,
}

impl GroupingConfig {
    /// Saturates instead of overflowing for absurdly large thresholds
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            max_gap_secs: minutes.saturating_mul(60),
        }
    }

    pub fn gap_threshold(&self) -> Duration {
        Duration::try_seconds(self.max_gap_secs).unwrap_or(Duration::MAX)
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        // Animals tend to linger or come back within half an hour
        Self::from_minutes(30)
    }
}

/// A maximal run of photos with no internal gap above the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildlifeEvent {
    /// Never empty, sorted by capture time
    records: Vec<TimestampedRecord>,
}

impl WildlifeEvent {
    pub fn new(mut records: Vec<TimestampedRecord>) -> Result<Self, GroupingError> {
        if records.is_empty() {
            return Err(GroupingError::EmptyEvent);
        }
        records.sort_by_key(|record| record.timestamp());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TimestampedRecord] {
        &self.records
    }

    pub fn first(&self) -> &TimestampedRecord {
        &self.records[0]
    }

    pub fn last(&self) -> &TimestampedRecord {
        &self.records[self.records.len() - 1]
    }

    pub fn first_timestamp(&self) -> NaiveDateTime {
        self.first().timestamp()
    }

    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.last().timestamp()
    }

    pub fn duration(&self) -> Duration {
        self.last_timestamp() - self.first_timestamp()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventSegmenter {
    config: GroupingConfig,
}

impl EventSegmenter {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Partition records into events, in ascending time order.
    ///
    /// Records are stably sorted by timestamp first. A new event starts when
    /// a record is strictly later than `previous + threshold`, so a gap of
    /// exactly the threshold keeps both records in the same event.
    pub fn segment(
        &self,
        mut records: Vec<TimestampedRecord>,
    ) -> Result<Vec<WildlifeEvent>, GroupingError> {
        if records.is_empty() {
            return Err(GroupingError::NoRecords);
        }

        records.sort_by_key(|record| record.timestamp());

        let threshold = self.config.gap_threshold();
        let mut events = Vec::new();
        let mut current: Vec<TimestampedRecord> = Vec::new();

        for record in records {
            // A limit past the end of the calendar keeps the record in the open event
            let starts_new_event = current
                .last()
                .and_then(|previous| previous.timestamp().checked_add_signed(threshold))
                .is_some_and(|limit| record.timestamp() > limit);

            if starts_new_event {
                events.push(WildlifeEvent::new(std::mem::take(&mut current))?);
            }
            current.push(record);
        }
        events.push(WildlifeEvent::new(current)?);

        tracing::debug!(
            events = events.len(),
            max_gap_secs = self.config.max_gap_secs,
            "segmented records"
        );

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn record(name: &str, timestamp: NaiveDateTime) -> TimestampedRecord {
        TimestampedRecord::new(format!("/cam/{}", name), timestamp)
    }

    fn names(event: &WildlifeEvent) -> Vec<String> {
        event
            .records()
            .iter()
            .map(|r| r.file_name().into_owned())
            .collect()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let segmenter = EventSegmenter::default();
        assert_eq!(segmenter.segment(Vec::new()), Err(GroupingError::NoRecords));
    }

    #[test]
    fn test_empty_event_is_rejected() {
        assert_eq!(WildlifeEvent::new(Vec::new()), Err(GroupingError::EmptyEvent));
    }

    #[test]
    fn test_single_record() {
        let events = EventSegmenter::default()
            .segment(vec![record("a.jpg", at(10, 0, 0))])
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].count(), 1);
        assert_eq!(events[0].duration(), Duration::zero());
        assert_eq!(events[0].first(), events[0].last());
    }

    #[test]
    fn test_two_visits_split_on_gap() {
        // 10:05 -> 10:40 is 35 minutes, above the 30 minute default
        let records = vec![
            record("a.jpg", at(10, 0, 0)),
            record("b.jpg", at(10, 5, 0)),
            record("c.jpg", at(10, 40, 0)),
            record("d.jpg", at(11, 0, 0)),
        ];

        let events = EventSegmenter::default().segment(records).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(names(&events[0]), vec!["a.jpg", "b.jpg"]);
        assert_eq!(names(&events[1]), vec!["c.jpg", "d.jpg"]);
        assert_eq!(events[0].duration(), Duration::minutes(5));
        assert_eq!(events[1].duration(), Duration::minutes(20));
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let records = vec![
            record("d.jpg", at(11, 0, 0)),
            record("b.jpg", at(10, 5, 0)),
            record("c.jpg", at(10, 40, 0)),
            record("a.jpg", at(10, 0, 0)),
        ];

        let events = EventSegmenter::default().segment(records).unwrap();

        assert_eq!(names(&events[0]), vec!["a.jpg", "b.jpg"]);
        assert_eq!(names(&events[1]), vec!["c.jpg", "d.jpg"]);
    }

    #[test]
    fn test_gap_equal_to_threshold_stays_together() {
        let records = vec![record("a.jpg", at(10, 0, 0)), record("b.jpg", at(10, 30, 0))];
        let events = EventSegmenter::default().segment(records).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].count(), 2);
    }

    #[test]
    fn test_gap_one_second_over_threshold_splits() {
        let records = vec![record("a.jpg", at(10, 0, 0)), record("b.jpg", at(10, 30, 1))];
        let events = EventSegmenter::default().segment(records).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_gap_is_measured_between_neighbours() {
        // Each step is within the threshold even though the event spans hours
        let records: Vec<_> = (0..6)
            .map(|i| record(&format!("{}.jpg", i), at(8 + i / 2, (i % 2) * 30, 0)))
            .collect();

        let events = EventSegmenter::default().segment(records).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].duration(), Duration::minutes(150));
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let records = vec![
            record("second.jpg", at(10, 0, 0)),
            record("first.jpg", at(9, 59, 0)),
            record("third.jpg", at(10, 0, 0)),
        ];

        let events = EventSegmenter::default().segment(records).unwrap();

        assert_eq!(names(&events[0]), vec!["first.jpg", "second.jpg", "third.jpg"]);
    }

    #[test]
    fn test_custom_threshold() {
        let records = vec![
            record("a.jpg", at(10, 0, 0)),
            record("b.jpg", at(10, 5, 0)),
            record("c.jpg", at(10, 11, 0)),
        ];

        let segmenter = EventSegmenter::new(GroupingConfig::from_minutes(5));
        let events = segmenter.segment(records).unwrap();

        assert_eq!(segmenter.config().gap_threshold(), Duration::minutes(5));
        assert_eq!(events.len(), 2);
        assert_eq!(names(&events[0]), vec!["a.jpg", "b.jpg"]);
        assert_eq!(names(&events[1]), vec!["c.jpg"]);
    }

    #[test]
    fn test_huge_threshold_keeps_everything_together() {
        let records = vec![
            record("a.jpg", at(10, 0, 0)),
            record("b.jpg", at(23, 0, 0)),
        ];

        for minutes in [1_000_000_000_000, 200_000_000_000_000_000, i64::MAX] {
            let config = GroupingConfig::from_minutes(minutes);
            assert!(config.gap_threshold() > Duration::days(365));

            let events = EventSegmenter::new(config).segment(records.clone()).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].count(), 2);
        }
    }

    #[test]
    fn test_partition_and_ordering() {
        let minutes = [0, 3, 50, 51, 52, 130, 200, 229, 260, 261];
        let records: Vec<_> = minutes
            .iter()
            .rev()
            .map(|m| record(&format!("{:03}.jpg", m), at(6 + m / 60, m % 60, 0)))
            .collect();

        let events = EventSegmenter::default().segment(records.clone()).unwrap();

        // Every record lands in exactly one event
        let total: usize = events.iter().map(WildlifeEvent::count).sum();
        assert_eq!(total, records.len());
        for input in &records {
            let hits = events
                .iter()
                .flat_map(|e| e.records())
                .filter(|r| *r == input)
                .count();
            assert_eq!(hits, 1);
        }

        let threshold = GroupingConfig::default().gap_threshold();
        for event in &events {
            for pair in event.records().windows(2) {
                assert!(pair[0].timestamp() <= pair[1].timestamp());
                assert!(pair[1].timestamp() - pair[0].timestamp() <= threshold);
            }
        }
        for pair in events.windows(2) {
            assert!(pair[0].last_timestamp() < pair[1].first_timestamp());
            assert!(pair[1].first_timestamp() - pair[0].last_timestamp() > threshold);
        }

        assert_eq!(events.len(), 5);
    }
}
