//! Request and response bodies exchanged with the Saytrix backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Backend paths, relative to the configured base URL
pub mod paths {
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_REGISTER: &str = "/auth/register";
    pub const AUTH_VERIFY: &str = "/auth/verify";
    pub const CHAT: &str = "/chat";
    pub const QUICK_ACTION: &str = "/quick-action";
    pub const CLEAR_MODE: &str = "/clear-mode";
    pub const MARKET_DATA: &str = "/market-data";
    pub const STOCK_ANALYSIS: &str = "/stock-analysis";
    pub const PORTFOLIO_CALCULATE: &str = "/portfolio-calculate";
    pub const CONVERSATIONS: &str = "/conversations";
    pub const ANALYTICS_USAGE: &str = "/analytics/usage";

    /// Quote endpoint on the third-party provider
    pub const QUOTE_QUERY: &str = "/query";

    /// `/conversations/{id}/history`, with `id` encoded as one path segment
    pub fn conversation_history(conversation_id: &str) -> String {
        format!(
            "{CONVERSATIONS}/{}/history",
            urlencoding::encode(conversation_id)
        )
    }
}

/// Window used by the usage analytics endpoint when none is given
pub const DEFAULT_USAGE_DAYS: u32 = 30;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Successful login or registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// User profile; shape is owned by the backend
    pub user: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Chat message request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Omitted to let the backend start a new conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Quick action shortcuts understood by the chat backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuickAction {
    StockSearch,
    PortfolioReview,
    MarketAnalysis,
    NewsUpdate,
    /// Any action the backend adds later
    Other(String),
}

impl QuickAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::StockSearch => "stock-search",
            Self::PortfolioReview => "portfolio-review",
            Self::MarketAnalysis => "market-analysis",
            Self::NewsUpdate => "news-update",
            Self::Other(action) => action,
        }
    }
}

impl From<String> for QuickAction {
    fn from(action: String) -> Self {
        match action.as_str() {
            "stock-search" => Self::StockSearch,
            "portfolio-review" => Self::PortfolioReview,
            "market-analysis" => Self::MarketAnalysis,
            "news-update" => Self::NewsUpdate,
            _ => Self::Other(action),
        }
    }
}

impl From<&str> for QuickAction {
    fn from(action: &str) -> Self {
        Self::from(action.to_string())
    }
}

impl From<QuickAction> for String {
    fn from(action: QuickAction) -> Self {
        match action {
            QuickAction::Other(action) => action,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for QuickAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quick action request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickActionRequest {
    pub action: QuickAction,
}

/// Stock analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysisRequest {
    pub symbol: String,
}

/// A single portfolio position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub avg_price: f64,
    /// Fields the backend accepts beyond the required ones
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: f64, avg_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_price,
            extra: Map::new(),
        }
    }
}

/// Portfolio valuation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    pub holdings: Vec<Holding>,
}

/// Alpha Vantage `GLOBAL_QUOTE` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalQuoteResponse {
    /// Empty when the provider does not know the symbol
    #[serde(rename = "Global Quote", default)]
    pub global_quote: Option<GlobalQuote>,
}

/// Quote fields as reported by the provider (numbers arrive as strings)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol", default)]
    pub symbol: String,
    #[serde(rename = "02. open", default)]
    pub open: String,
    #[serde(rename = "03. high", default)]
    pub high: String,
    #[serde(rename = "04. low", default)]
    pub low: String,
    #[serde(rename = "05. price", default)]
    pub price: String,
    #[serde(rename = "06. volume", default)]
    pub volume: String,
    #[serde(rename = "07. latest trading day", default)]
    pub latest_trading_day: String,
    #[serde(rename = "08. previous close", default)]
    pub previous_close: String,
    #[serde(rename = "09. change", default)]
    pub change: String,
    #[serde(rename = "10. change percent", default)]
    pub change_percent: String,
}

impl GlobalQuote {
    /// Current price, if the provider sent a parsable one
    pub fn price(&self) -> Option<f64> {
        self.price.trim().parse().ok()
    }

    /// Absolute change since the previous close
    pub fn change(&self) -> Option<f64> {
        self.change.trim().parse().ok()
    }

    /// Traded volume
    pub fn volume(&self) -> Option<u64> {
        self.volume.trim().parse().ok()
    }
}

impl GlobalQuoteResponse {
    /// The quote, unless the provider returned an empty object
    pub fn quote(&self) -> Option<&GlobalQuote> {
        self.global_quote
            .as_ref()
            .filter(|quote| !quote.symbol.is_empty() || !quote.price.is_empty())
    }
}
