//! Application state shared across handlers

use std::sync::Arc;

use crate::store::Database;

#[derive(Clone)]
pub struct AppState {
    database: Arc<Database>,
}

impl AppState {
    pub fn new(database: Database) -> Self {
        Self {
            database: Arc::new(database),
        }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }
}
