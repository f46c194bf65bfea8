pub mod repository;

use contracts::shared::logger::LogSource;
use repository::log_event_internal;

/// Логирование бизнес-события на сервере
///
/// # Примеры
/// ```ignore
/// logger::log("leads", "Статус заявки 42 изменён на contacted");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal(LogSource::Server, category, message);
}
