//! Application state for dependency injection.

use std::sync::Arc;
use std::time::Instant;

use crate::http::middleware::RequestMetrics;
use crate::infra::{ConnectivityProbe, Database};
use crate::repository::UserStore;
use crate::service::{UserManager, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub probe: Arc<dyn ConnectivityProbe>,
    pub metrics: Arc<RequestMetrics>,
    pub started_at: Instant,
}

impl AppState {
    /// Create new app state from explicitly constructed collaborators.
    pub fn new(users: Arc<dyn UserService>, probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self {
            users,
            probe,
            metrics: Arc::new(RequestMetrics::new()),
            started_at: Instant::now(),
        }
    }

    /// Wire the repository, service and probe over one connection pool.
    pub fn from_database(database: Database) -> Self {
        let user_repo = Arc::new(UserStore::new(database.get_connection()));
        let users = Arc::new(UserManager::new(user_repo));

        Self::new(users, Arc::new(database))
    }
}
