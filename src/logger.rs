use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

/// Append-only NDJSON log of the client's vendor API traffic, one entry
/// per request, command, or completed refresh.
#[derive(Debug)]
pub(crate) struct MessageLogger {
    file: File,
}

impl MessageLogger {
    pub fn new(path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    pub fn log_request(&mut self, method: &str, path: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "method": method,
            "path": path,
        });
        self.write_line(&entry);
    }

    pub fn log_command(&mut self, action: &str, device: u64, value: f64) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "action": action,
            "device": device,
            "value": value,
        });
        self.write_line(&entry);
    }

    pub fn log_refresh(&mut self, device_count: usize) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "refresh",
            "devices": device_count,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn read_lines(path: &str) -> Vec<Value> {
        let mut contents = String::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn log_request_writes_ndjson() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(path).unwrap();
        logger.log_request("GET", "/api/gateway");

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "req");
        assert_eq!(lines[0]["method"], "GET");
        assert_eq!(lines[0]["path"], "/api/gateway");
        assert!(lines[0]["ts"].as_str().is_some());
    }

    #[test]
    fn log_command_captures_device_and_value() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(path).unwrap();
        logger.log_command("set_temperature", 42, 25.5);

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "cmd");
        assert_eq!(lines[0]["action"], "set_temperature");
        assert_eq!(lines[0]["device"], 42);
        assert_eq!(lines[0]["value"], 25.5);
    }

    #[test]
    fn log_refresh_appends() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(path).unwrap();
        logger.log_refresh(3);
        logger.log_refresh(2);

        let lines = read_lines(path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["devices"], 3);
        assert_eq!(lines[1]["devices"], 2);
    }
}
