//! Usage analytics client methods

use super::{ApiResponse, ClientError, SaytrixClient};
use crate::types::{DEFAULT_USAGE_DAYS, paths};
use reqwest::Method;

impl SaytrixClient {
    /// Usage summary for the last `days` days (30 when `None`)
    pub async fn get_user_usage(&self, days: Option<u32>) -> Result<ApiResponse, ClientError> {
        let request = self
            .request(Method::GET, paths::ANALYTICS_USAGE)
            .query(&[("days", days.unwrap_or(DEFAULT_USAGE_DAYS))]);
        self.dispatch(request).await
    }
}
