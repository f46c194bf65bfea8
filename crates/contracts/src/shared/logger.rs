use serde::{Deserialize, Serialize};

pub const CATEGORY_LEADS: &str = "leads";
pub const CATEGORY_TRACKING: &str = "tracking";
pub const CATEGORY_REPORT: &str = "report";
pub const CATEGORY_STARTUP: &str = "startup";

/// Источник записи лога
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Client,
    #[default]
    Server,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Client => "client",
            LogSource::Server => "server",
        }
    }

    /// Всё, кроме "client", читается как запись сервера
    pub fn from_stored(s: &str) -> Self {
        if s.eq_ignore_ascii_case("client") {
            LogSource::Client
        } else {
            LogSource::Server
        }
    }
}

/// Запись лога системы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: LogSource,
    pub category: String,
    pub message: String,
}

/// DTO для создания новой записи лога (`POST /api/logs`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    #[serde(default = "client_source")]
    pub source: LogSource,
    pub category: String,
    pub message: String,
}

fn client_source() -> LogSource {
    LogSource::Client
}
