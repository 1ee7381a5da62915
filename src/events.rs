//! Job event log.
//!
//! When `event_log` is configured, the dispatcher appends one JSON object per
//! line (NDJSON) for every process it starts, finishes waiting on, or fails
//! to orchestrate.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `spawn`, `background`, `complete` or `failure`
//! - `actor`: `user@HOST`
//! - `pid`: process id, when one exists
//! - `details`: freeform object with action-specific details

use crate::error::{Result, ShellError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Foreground process started.
    Spawn,
    /// Background process started and released.
    Background,
    /// Wait on a foreground process returned.
    Complete,
    /// Orchestration failed.
    Failure,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Spawn => write!(f, "spawn"),
            EventAction::Background => write!(f, "background"),
            EventAction::Complete => write!(f, "complete"),
            EventAction::Failure => write!(f, "failure"),
        }
    }
}

/// An event record for the job log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The user running the shell (e.g., `user@HOST`).
    pub actor: String,

    /// Process id the event refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            pid: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the process id for this event.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ShellError::Resource {
            what: "event serialization",
            source: e.into(),
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON sink.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event as one line, creating the file and its parent
    /// directory if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ShellError::Resource {
                what: "event log directory creation",
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ShellError::Resource {
                what: "event log open",
                source,
            })?;

        writeln!(file, "{}", json_line).map_err(|source| ShellError::Resource {
            what: "event log write",
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Spawn);

        assert_eq!(event.action, EventAction::Spawn);
        assert!(!event.actor.is_empty());
        assert!(event.pid.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::new(EventAction::Complete)
            .with_pid(4242)
            .with_details(json!({"outcome": "exited", "code": 0}));

        let json_line = event.to_ndjson_line().unwrap();
        assert!(!json_line.contains('\n'));

        let parsed: Event = serde_json::from_str(&json_line).unwrap();
        assert_eq!(parsed.action, EventAction::Complete);
        assert_eq!(parsed.pid, Some(4242));
        assert_eq!(parsed.details["outcome"], "exited");
    }

    #[test]
    fn test_event_without_pid_omits_field() {
        let json_line = Event::new(EventAction::Failure).to_ndjson_line().unwrap();
        let parsed: Value = serde_json::from_str(&json_line).unwrap();
        assert!(parsed.get("pid").is_none());
        assert_eq!(parsed["action"], "failure");
    }

    #[test]
    fn test_append_creates_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("logs").join("events.ndjson"));

        log.append(&Event::new(EventAction::Spawn).with_pid(1)).unwrap();
        log.append(&Event::new(EventAction::Background).with_pid(2)).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.ends_with('\n'));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: Event = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.action, EventAction::Background);
        assert_eq!(second.pid, Some(2));
    }

    #[test]
    fn test_append_to_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let log = EventLog::new(temp_dir.path());
        assert!(log.append(&Event::new(EventAction::Spawn)).is_err());
    }

    #[test]
    fn test_event_action_display() {
        assert_eq!(EventAction::Spawn.to_string(), "spawn");
        assert_eq!(EventAction::Background.to_string(), "background");
        assert_eq!(EventAction::Complete.to_string(), "complete");
        assert_eq!(EventAction::Failure.to_string(), "failure");
    }

    #[test]
    fn test_get_actor_string() {
        let actor = get_actor_string();
        assert!(actor.contains('@'));
    }
}
