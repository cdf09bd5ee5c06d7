use std::sync::Arc;

use crate::dashboards::d100_customer_insights::service::DashboardSettings;
use crate::domain::a001_retail_transaction::DatasetCache;

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub cache: Arc<DatasetCache>,
    pub settings: Arc<DashboardSettings>,
}

impl AppState {
    pub fn new(cache: Arc<DatasetCache>, settings: DashboardSettings) -> Self {
        Self {
            cache,
            settings: Arc::new(settings),
        }
    }
}
