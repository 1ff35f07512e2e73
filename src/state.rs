use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::council::CouncilCalendar;
use crate::services::notify::NotifyProvider;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub council: Box<dyn CouncilCalendar>,
    pub notifier: Box<dyn NotifyProvider>,
}
