//! Portfolio client methods

use super::{ApiResponse, ClientError, SaytrixClient};
use crate::types::{Holding, PortfolioRequest, paths};
use reqwest::Method;

impl SaytrixClient {
    /// Value a set of holdings at current market prices
    pub async fn calculate_portfolio(
        &self,
        holdings: Vec<Holding>,
    ) -> Result<ApiResponse, ClientError> {
        let request = self
            .request(Method::POST, paths::PORTFOLIO_CALCULATE)
            .json(&PortfolioRequest { holdings });
        self.dispatch(request).await
    }
}
