//! Swyftx REST API endpoint constants.

/// Base URL for the live trading venue.
pub const LIVE_BASE_URL: &str = "https://api.swyftx.com.au";

/// Base URL for the demo/sandbox trading venue.
pub const DEMO_BASE_URL: &str = "https://api.demo.swyftx.com.au";

/// Authentication endpoints (no bearer token required).
pub mod auth {
    /// Exchange the API key for an access token.
    pub const REFRESH: &str = "/auth/refresh/";
    /// Invalidate the current access token.
    pub const LOGOUT: &str = "/auth/logout/";
}

/// User and account endpoints (authentication required).
pub mod user {
    /// Get the user profile.
    pub const PROFILE: &str = "/user/";
    /// Get account balances.
    pub const BALANCE: &str = "/user/balance/";
    /// Get account trading statistics.
    pub const STATISTICS: &str = "/user/statistics/";
    /// Set the default display currency.
    pub const CURRENCY: &str = "/user/currency/";
    /// List API keys on the account.
    pub const API_KEYS: &str = "/user/apiKeys/";
    /// Get the scope of the current API key.
    pub const API_KEY_SCOPE: &str = "/user/apiKeys/scope/";
    /// Revoke a single API key.
    pub const API_KEY_REVOKE: &str = "/user/apiKeys/revoke/";
    /// Revoke every API key on the account.
    pub const API_KEYS_REVOKE_ALL: &str = "/user/apiKeys/revokeAll/";
}

/// Market data endpoints (no authentication required).
pub mod markets {
    /// List all known assets.
    pub const ASSETS: &str = "/markets/assets/";

    /// Basic market info for one asset, or all assets when `asset` is `None`.
    pub fn basic_info(asset: Option<&str>) -> String {
        match asset {
            Some(asset) => format!("/markets/info/basic/{asset}/"),
            None => "/markets/info/basic/".to_string(),
        }
    }

    /// Detailed market info for one asset, or all assets when `asset` is `None`.
    pub fn detail_info(asset: Option<&str>) -> String {
        match asset {
            Some(asset) => format!("/markets/info/detail/{asset}/"),
            None => "/markets/info/detail/".to_string(),
        }
    }

    /// Live buy/sell rates denominated in the given asset.
    pub fn live_rates(denominating_asset_id: u32) -> String {
        format!("/live-rates/{denominating_asset_id}/")
    }
}

/// Order endpoints (authentication required).
pub mod orders {
    /// List orders, or place an order via POST.
    pub const ORDERS: &str = "/orders/";
    /// Quote the current exchange rate for a prospective order.
    pub const RATE: &str = "/orders/rate/";

    /// Fetch one order by its UUID.
    pub fn by_id(order_uuid: &str) -> String {
        format!("/orders/byId/{order_uuid}/")
    }

    /// Update or cancel one order by its UUID.
    pub fn order(order_uuid: &str) -> String {
        format!("/orders/{order_uuid}/")
    }
}

/// Transaction history endpoints (authentication required, paginated).
pub mod history {
    /// All transactions.
    pub const ALL: &str = "/history/all/";
    /// Deposit history.
    pub const DEPOSITS: &str = "/history/deposit/";
    /// Withdrawal history.
    pub const WITHDRAWALS: &str = "/history/withdraw/";
}

/// Account limit endpoints (authentication required).
pub mod limits {
    /// Remaining withdrawal limits.
    pub const WITHDRAWAL: &str = "/limits/withdrawal/";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templated_paths() {
        assert_eq!(markets::basic_info(Some("BTC")), "/markets/info/basic/BTC/");
        assert_eq!(markets::basic_info(None), "/markets/info/basic/");
        assert_eq!(markets::live_rates(36), "/live-rates/36/");
        assert_eq!(orders::by_id("ord-1"), "/orders/byId/ord-1/");
        assert_eq!(orders::order("ord-1"), "/orders/ord-1/");
    }
}
