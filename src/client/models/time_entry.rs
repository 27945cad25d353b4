//! Time entry model and its running/stopped state transitions
//!
//! An entry is running while its duration holds the negative sentinel
//! [`RUNNING_DURATION`]; once stopped, `duration == stop - start` in whole
//! seconds. The setters below keep that identity after every change. None of
//! them perform I/O; persisting the result is up to the caller.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TimeEntryError;

/// Duration stored on an entry that has not been stopped yet.
pub const RUNNING_DURATION: i64 = -1;

/// A single time entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Time entry ID
    #[serde(default)]
    pub id: i64,

    /// Owning workspace ID
    #[serde(default)]
    pub workspace_id: i64,

    /// Project ID (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    /// Task ID (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Start instant, absent on a malformed or not yet started entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    /// Stop instant, absent while running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,

    /// Tag names, unique, in display order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    /// Elapsed seconds, or negative while running
    #[serde(default)]
    pub duration: i64,

    /// Whether only the duration (not start/stop) is tracked
    #[serde(default)]
    pub duronly: bool,

    /// Billable flag (paid workspaces only)
    #[serde(default)]
    pub billable: bool,
}

/// `start` moved by `seconds`, or `InvalidState` when that leaves chrono's range.
fn offset_by(start: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>, TimeEntryError> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| {
            TimeEntryError::InvalidState(format!(
                "a duration of {} seconds is out of range",
                seconds
            ))
        })
}

/// The API sends `"tags": null` for untagged entries.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TimeEntry {
    /// A new running entry starting now.
    pub fn start(description: impl Into<String>, workspace_id: i64) -> Self {
        Self {
            workspace_id,
            description: description.into(),
            start: Some(Utc::now()),
            duration: RUNNING_DURATION,
            ..Self::default()
        }
    }

    /// True while the entry has not been stopped.
    pub fn is_running(&self) -> bool {
        self.duration < 0
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn stop_time(&self) -> Option<DateTime<Utc>> {
        self.stop
    }

    fn require_stopped(&self, operation: &str) -> Result<DateTime<Utc>, TimeEntryError> {
        if self.is_running() {
            return Err(TimeEntryError::InvalidState(format!(
                "cannot {} of running entry {}; stop it first",
                operation, self.id
            )));
        }
        self.start.ok_or_else(|| {
            TimeEntryError::InvalidState(format!("entry {} has no start time", self.id))
        })
    }

    /// Set the elapsed seconds of a stopped entry, moving its stop time.
    ///
    /// Fails without touching the entry if it is running or if the stop time
    /// would fall outside the representable range.
    pub fn set_duration(&mut self, seconds: i64) -> Result<(), TimeEntryError> {
        let start = self.require_stopped("set duration")?;
        let stop = offset_by(start, seconds)?;

        self.duration = seconds;
        self.stop = Some(stop);
        Ok(())
    }

    /// Move the start time.
    ///
    /// A running entry only changes its start. For a stopped entry,
    /// `update_end` keeps the duration and moves the stop time; otherwise the
    /// stop time stays and the duration is recomputed. That recomputation is
    /// not clamped: a start after the stop yields a negative duration.
    ///
    /// Fails without touching the entry only when the moved stop time would
    /// fall outside the representable range.
    pub fn set_start_time(
        &mut self,
        start: DateTime<Utc>,
        update_end: bool,
    ) -> Result<(), TimeEntryError> {
        if self.is_running() {
            self.start = Some(start);
            return Ok(());
        }

        match self.stop {
            Some(stop) if !update_end => {
                self.duration = stop.timestamp() - start.timestamp();
            }
            _ => {
                self.stop = Some(offset_by(start, self.duration)?);
            }
        }
        self.start = Some(start);
        Ok(())
    }

    /// Set the stop time of a stopped entry, recomputing its duration.
    pub fn set_stop_time(&mut self, stop: DateTime<Utc>) -> Result<(), TimeEntryError> {
        let start = self.require_stopped("set stop time")?;

        self.stop = Some(stop);
        self.duration = (stop - start).num_seconds();
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Append a tag unless already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    /// Remove a tag if present.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// The same entry, running again from its original start.
    pub fn resumed(&self) -> Self {
        Self {
            stop: None,
            duration: RUNNING_DURATION,
            ..self.clone()
        }
    }
}

/// Request body for creating a time entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntryCreate {
    pub billable: bool,
    pub description: String,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub workspace_id: i64,
    /// Client application name; filled in by the transport when empty
    #[serde(default)]
    pub created_with: String,
}

impl TimeEntryCreate {
    /// Body for a timer starting now.
    pub fn start(description: impl Into<String>, workspace_id: i64) -> Self {
        Self {
            description: description.into(),
            duration: RUNNING_DURATION,
            start: Some(Utc::now()),
            workspace_id,
            ..Self::default()
        }
    }

    /// Copy project, task, tags and billable flag from an existing entry.
    pub fn with_metadata_from(mut self, entry: &TimeEntry) -> Self {
        self.project_id = entry.project_id;
        self.task_id = entry.task_id;
        self.tags = entry.tags.clone();
        self.billable = entry.billable;
        self
    }

    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_billable(mut self, billable: bool) -> Self {
        self.billable = billable;
        self
    }
}

/// Direction of a tag change on an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAction {
    Add,
    Remove,
}

impl TagAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagAction::Add => "add",
            TagAction::Remove => "remove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, h, m, s).unwrap()
    }

    fn stopped_entry() -> TimeEntry {
        TimeEntry {
            id: 1,
            workspace_id: 10,
            description: "Write report".to_string(),
            start: Some(at(9, 0, 0)),
            stop: Some(at(10, 0, 0)),
            duration: 3600,
            ..TimeEntry::default()
        }
    }

    fn assert_consistent(entry: &TimeEntry) {
        let start = entry.start.unwrap();
        let stop = entry.stop.unwrap();
        assert_eq!(entry.duration, stop.timestamp() - start.timestamp());
    }

    #[test]
    fn test_running_constructor() {
        let entry = TimeEntry::start("Focus", 10);
        assert!(entry.is_running());
        assert_eq!(entry.duration, RUNNING_DURATION);
        assert!(entry.start.is_some());
        assert!(entry.stop.is_none());
        assert_eq!(entry.workspace_id, 10);
    }

    #[test]
    fn test_is_running_follows_duration_sign() {
        let mut entry = stopped_entry();
        assert!(!entry.is_running());
        entry.duration = 0;
        assert!(!entry.is_running());
        entry.duration = -1_700_000_000;
        assert!(entry.is_running());
    }

    #[test]
    fn test_set_duration_moves_stop() {
        let mut entry = stopped_entry();
        entry.set_duration(1800).unwrap();

        assert_eq!(entry.duration, 1800);
        assert_eq!(entry.stop, Some(at(9, 30, 0)));
        assert_consistent(&entry);
    }

    #[test]
    fn test_set_duration_on_running_entry_fails_untouched() {
        let mut entry = TimeEntry::start("Focus", 10);
        let before = entry.clone();

        let err = entry.set_duration(60).unwrap_err();

        assert!(matches!(err, TimeEntryError::InvalidState(_)));
        assert_eq!(entry, before);
    }

    #[test]
    fn test_set_stop_time_on_running_entry_fails_untouched() {
        let mut entry = TimeEntry::start("Focus", 10);
        let before = entry.clone();

        assert!(entry.set_stop_time(Utc::now()).is_err());
        assert_eq!(entry, before);
    }

    #[test]
    fn test_set_stop_time_recomputes_duration() {
        let mut entry = stopped_entry();
        entry.set_stop_time(at(11, 15, 0)).unwrap();

        assert_eq!(entry.duration, 8100);
        assert_consistent(&entry);
    }

    #[test]
    fn test_set_stop_time_truncates_to_whole_seconds() {
        let mut entry = stopped_entry();
        let stop = at(9, 0, 10) + Duration::milliseconds(900);
        entry.set_stop_time(stop).unwrap();

        assert_eq!(entry.duration, 10);
    }

    #[test]
    fn test_set_start_time_keeping_duration() {
        let mut entry = stopped_entry();
        entry.set_start_time(at(8, 0, 0), true).unwrap();

        assert_eq!(entry.duration, 3600);
        assert_eq!(entry.stop, Some(at(9, 0, 0)));
        assert_consistent(&entry);
    }

    #[test]
    fn test_set_start_time_keeping_stop() {
        let mut entry = stopped_entry();
        entry.set_start_time(at(8, 0, 0), false).unwrap();

        assert_eq!(entry.duration, 7200);
        assert_eq!(entry.stop, Some(at(10, 0, 0)));
        assert_consistent(&entry);
    }

    #[test]
    fn test_set_start_time_on_running_entry_only_moves_start() {
        let mut entry = TimeEntry::start("Focus", 10);
        entry.set_start_time(at(8, 0, 0), false).unwrap();

        assert_eq!(entry.start, Some(at(8, 0, 0)));
        assert!(entry.stop.is_none());
        assert_eq!(entry.duration, RUNNING_DURATION);
    }

    #[test]
    fn test_set_start_after_stop_yields_negative_duration() {
        // Not clamped: the entry now reads as running.
        let mut entry = stopped_entry();
        entry.set_start_time(at(10, 30, 0), false).unwrap();

        assert_eq!(entry.duration, -1800);
        assert!(entry.is_running());
        assert_eq!(entry.stop, Some(at(10, 0, 0)));
    }

    #[test]
    fn test_mixed_edits_keep_identity() {
        let mut entry = stopped_entry();

        entry.set_start_time(at(7, 45, 0), false).unwrap();
        assert_consistent(&entry);
        entry.set_duration(5400).unwrap();
        assert_consistent(&entry);
        entry.set_stop_time(at(12, 0, 0)).unwrap();
        assert_consistent(&entry);
        entry.set_start_time(at(11, 0, 0), true).unwrap();
        assert_consistent(&entry);
        entry.set_start_time(at(10, 0, 0), false).unwrap();
        assert_consistent(&entry);
    }

    #[test]
    fn test_set_duration_out_of_range_fails_untouched() {
        let mut entry = stopped_entry();
        let before = entry.clone();

        for seconds in [i64::MAX / 2, i64::MIN / 2, i64::MAX] {
            let err = entry.set_duration(seconds).unwrap_err();
            assert!(matches!(err, TimeEntryError::InvalidState(_)));
            assert_eq!(entry, before);
        }
    }

    #[test]
    fn test_set_start_time_out_of_range_fails_untouched() {
        let mut entry = TimeEntry {
            duration: i64::MAX / 2,
            ..stopped_entry()
        };
        let before = entry.clone();

        assert!(matches!(
            entry.set_start_time(at(8, 0, 0), true),
            Err(TimeEntryError::InvalidState(_))
        ));
        assert_eq!(entry, before);
    }

    #[test]
    fn test_stopped_entry_without_start_is_invalid() {
        let mut entry = TimeEntry {
            duration: 60,
            ..TimeEntry::default()
        };

        assert!(matches!(
            entry.set_duration(30),
            Err(TimeEntryError::InvalidState(_))
        ));
    }

    #[test]
    fn test_tags_are_idempotent() {
        let mut entry = stopped_entry();

        entry.add_tag("deep-work");
        entry.add_tag("deep-work");
        assert_eq!(entry.tags, vec!["deep-work".to_string()]);
        assert!(entry.has_tag("deep-work"));

        entry.remove_tag("missing");
        assert_eq!(entry.tags.len(), 1);

        entry.remove_tag("deep-work");
        assert!(!entry.has_tag("deep-work"));
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn test_tags_keep_insertion_order() {
        let mut entry = stopped_entry();
        entry.add_tag("b");
        entry.add_tag("a");
        entry.add_tag("c");
        entry.remove_tag("a");

        assert_eq!(entry.tags, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = stopped_entry();
        let mut copy = original.clone();

        copy.add_tag("copied");
        copy.set_stop_time(at(12, 0, 0)).unwrap();

        assert!(original.tags.is_empty());
        assert_eq!(original.stop, Some(at(10, 0, 0)));
        assert_eq!(original.duration, 3600);
    }

    #[test]
    fn test_resumed_keeps_identity_and_start() {
        let entry = stopped_entry();
        let resumed = entry.resumed();

        assert_eq!(resumed.id, entry.id);
        assert_eq!(resumed.start, entry.start);
        assert!(resumed.stop.is_none());
        assert!(resumed.is_running());
    }

    #[test]
    fn test_deserialize_accepts_both_offset_styles() {
        let json = r#"{
            "id": 5,
            "workspace_id": 10,
            "description": "Review",
            "start": "2024-03-05T09:00:00Z",
            "stop": "2024-03-05T10:00:00+00:00",
            "duration": 3600,
            "tags": null,
            "duronly": false,
            "billable": true
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.start, Some(at(9, 0, 0)));
        assert_eq!(entry.stop, Some(at(10, 0, 0)));
        assert!(entry.tags.is_empty());
        assert!(entry.billable);
        assert_consistent(&entry);
    }

    #[test]
    fn test_deserialize_running_entry() {
        let json = r#"{
            "id": 6,
            "workspace_id": 10,
            "start": "2024-03-05T09:00:00+02:00",
            "duration": -1,
            "tags": ["a"]
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_running());
        assert_eq!(entry.start, Some(at(7, 0, 0)));
        assert!(entry.stop.is_none());
        assert_eq!(entry.tags, vec!["a".to_string()]);
    }

    #[test]
    fn test_create_body_copies_metadata() {
        let mut source = stopped_entry();
        source.project_id = Some(3);
        source.task_id = Some(4);
        source.billable = true;
        source.add_tag("client-x");

        let body = TimeEntryCreate::start("Write report", 10).with_metadata_from(&source);

        assert_eq!(body.duration, RUNNING_DURATION);
        assert_eq!(body.project_id, Some(3));
        assert_eq!(body.task_id, Some(4));
        assert_eq!(body.tags, vec!["client-x".to_string()]);
        assert!(body.billable);
    }

    #[test]
    fn test_create_body_omits_absent_optionals() {
        let body = TimeEntryCreate {
            description: "x".to_string(),
            workspace_id: 1,
            ..TimeEntryCreate::default()
        };
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("project_id").is_none());
        assert!(json.get("stop").is_none());
        assert_eq!(json["workspace_id"], 1);
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_tag_action_serializes_lowercase() {
        assert_eq!(serde_json::to_value(TagAction::Add).unwrap(), "add");
        assert_eq!(TagAction::Remove.as_str(), "remove");
    }
}
