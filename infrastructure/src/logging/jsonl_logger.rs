//! JSONL transcript of a run or batch.
//!
//! Every [`ConversationEvent`] becomes one JSON line carrying `type`,
//! `seq` and `timestamp` next to the event's own fields. The file is opened
//! in append mode so resumed batches extend the same transcript.

use nl2plan_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe via `Mutex<BufWriter<File>>`; flushed after each line.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    seq: AtomicU64,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) `path` for appending, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            seq: AtomicU64::new(0),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event: ConversationEvent) -> Value {
        let mut record = Map::new();
        record.insert("type".into(), Value::from(event.event_type));
        record.insert(
            "seq".into(),
            Value::from(self.seq.fetch_add(1, Ordering::Relaxed)),
        );
        record.insert(
            "timestamp".into(),
            Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        match event.payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("data".into(), other);
            }
        }
        Value::Object(record)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&self.record(event)) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl2plan_application::ports::conversation_logger::events;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("run.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(
            events::RESPONSE,
            serde_json::json!({ "model": "canned", "bytes": 42 }),
        ));
        logger.log(ConversationEvent::new(
            events::RUN_FINISHED,
            serde_json::json!({ "code": 4, "type": "ignored" }),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "llm_response");
        assert_eq!(lines[0]["model"], "canned");
        assert_eq!(lines[0]["seq"], 0);
        assert!(lines[0]["timestamp"].is_string());
        // payload fields never shadow the envelope
        assert_eq!(lines[1]["type"], "run_finished");
        assert_eq!(lines[1]["code"], 4);
        assert_eq!(lines[1]["seq"], 1);
    }

    #[test]
    fn test_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();
        logger.log(ConversationEvent::new(events::PROMPT, Value::from("just text")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["data"], "just text");
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.jsonl");
        for _ in 0..2 {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::new(events::PROMPT, Value::Null));
        }
        assert_eq!(read_lines(&path).len(), 2);
    }
}
