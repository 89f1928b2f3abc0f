//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx style, with the envelope code appended)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;

/// One served request, as seen by the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method
    pub method: String,
    /// Request path (routing ignores it)
    pub path: String,
    /// Raw query string, i.e. the route selector
    pub selector: String,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Envelope `code` of the reply
    pub code: i64,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String, selector: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            selector,
            http_version: "1.1".to_string(),
            code: 0,
            body_bytes: 0,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        if self.selector.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.selector)
        }
    }

    /// `$remote_addr - - [$time_local] "$request" 200 $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" 200 {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.request_uri(),
            self.http_version,
            self.body_bytes,
        )
    }

    /// Common format plus user agent, envelope code and request time
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" code={} {:.3}s",
            self.format_common(),
            self.user_agent.as_deref().unwrap_or("-"),
            self.code,
            self.request_seconds(),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "selector": self.selector,
            "http_version": self.http_version,
            "code": self.code,
            "body_bytes": self.body_bytes,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path?selector HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$selector` - Raw query string used for routing
    /// - `$code` - Envelope code of the reply
    /// - `$body_bytes_sent` - Response body size
    /// - `$http_user_agent` - User-Agent header
    /// - `$request_time` - Request processing time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        let request_line = format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        );

        // $request_time and $request_method must come before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace(
                "$time_local",
                &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            )
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{:.3}", self.request_seconds()))
            .replace("$request_method", &self.method)
            .replace("$request", &request_line)
            .replace("$selector", &self.selector)
            .replace("$code", &self.code.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace(
                "$http_user_agent",
                self.user_agent.as_deref().unwrap_or("-"),
            )
    }

    #[allow(clippy::cast_precision_loss)]
    fn request_seconds(&self) -> f64 {
        self.request_time_us as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "POST".to_string(),
            "/".to_string(),
            "word/save".to_string(),
        );
        entry.code = -1;
        entry.body_bytes = 42;
        entry.user_agent = Some("curl/8.5".to_string());
        entry.request_time_us = 1_250_000;
        entry
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("POST /?word/save HTTP/1.1"));
        assert!(log.contains("200 42"));
        assert!(!log.contains("curl/8.5"));
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.contains("POST /?word/save HTTP/1.1"));
        assert!(log.contains("\"curl/8.5\""));
        assert!(log.contains("code=-1"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["selector"], "word/save");
        assert_eq!(value["code"], -1);
        assert_eq!(value["body_bytes"], 42);
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$remote_addr $request_method [$selector] $code $request_time");
        assert_eq!(log, "192.168.1.1 POST [word/save] -1 1.250");
    }

    #[test]
    fn test_empty_selector() {
        let mut entry = create_test_entry();
        entry.selector = String::new();
        assert!(entry.format("common").contains("POST / HTTP/1.1"));
    }
}
