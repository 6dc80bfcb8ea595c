//! Request and response models for the Swyftx REST API.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Swyftx order type identifiers.
///
/// The API represents order types as small integers.
pub mod order_types {
    /// Immediate buy at market rate.
    pub const MARKET_BUY: u8 = 1;
    /// Immediate sell at market rate.
    pub const MARKET_SELL: u8 = 2;
    /// Buy when the trigger price is reached.
    pub const TRIGGER_BUY: u8 = 3;
    /// Sell when the trigger price is reached.
    pub const TRIGGER_SELL: u8 = 4;
    /// Stop buy order.
    pub const STOP_BUY: u8 = 5;
    /// Stop sell order.
    pub const STOP_SELL: u8 = 6;
    /// Dust sell of residual balances.
    pub const DUST_SELL: u8 = 8;
}

/// User profile, nested under `user` in the profile response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name.
    pub name: Option<String>,
    /// Account email address.
    pub email: Option<String>,
    /// Default display currency asset id.
    pub currency: Option<u32>,
}

/// Wrapper around the profile endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileEnvelope {
    pub user: Profile,
}

/// A single asset balance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Numeric asset identifier.
    pub asset_id: u32,
    /// Balance available for trading.
    pub available_balance: Decimal,
}

/// Aggregate account trading statistics.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    /// Number of orders placed.
    pub orders: Option<u64>,
    /// Total value traded.
    pub traded: Option<Decimal>,
    /// Total deposited.
    pub deposited: Option<Decimal>,
    /// Total withdrawn.
    pub withdrawn: Option<Decimal>,
}

/// An API key registered on the account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInfo {
    /// Key identifier.
    pub id: String,
    /// Caller-assigned label.
    pub label: Option<String>,
    /// Space-separated scope string.
    pub scope: Option<String>,
    /// Creation time, unix milliseconds.
    pub created: Option<i64>,
}

/// Scope granted to the current API key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyScope {
    /// Space-separated scope string.
    pub scope: String,
}

/// A tradable asset known to the exchange.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Numeric asset identifier.
    pub id: u32,
    /// Ticker code, e.g. "BTC".
    pub code: String,
    /// Full asset name.
    pub name: String,
    /// Whether deposits are currently enabled.
    #[serde(default)]
    pub deposit_enabled: Option<bool>,
    /// Whether withdrawals are currently enabled.
    #[serde(default)]
    pub withdraw_enabled: Option<bool>,
    /// Minimum withdrawal amount.
    #[serde(default)]
    pub minimum_order: Option<Decimal>,
}

/// Basic market info for one asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAssetInfo {
    /// Numeric asset identifier.
    pub id: u32,
    /// Ticker code.
    pub code: String,
    /// Current buy rate.
    pub buy: Option<Decimal>,
    /// Current sell rate.
    pub sell: Option<Decimal>,
    /// Market-cap rank.
    pub rank: Option<u32>,
}

/// Detailed market info for one asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAssetInfo {
    /// Numeric asset identifier.
    pub id: u32,
    /// Ticker code.
    pub code: String,
    /// Asset description text.
    pub description: Option<String>,
    /// Current buy/sell spread.
    pub spread: Option<Decimal>,
    /// 24h traded volume.
    pub volume: Option<Decimal>,
}

/// A live rate quote, keyed by asset id in the live-rates response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRate {
    /// Current buy price.
    pub buy_price: Option<Decimal>,
    /// Current sell price.
    pub sell_price: Option<Decimal>,
    /// Mid-market price.
    pub mid_price: Option<Decimal>,
    /// Price change over the last 24h, percent.
    pub daily_price_change: Option<Decimal>,
}

/// Live rates for all assets, denominated in the requested asset.
pub type LiveRates = HashMap<String, LiveRate>;

/// Parameters for placing an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Asset the order is priced in, e.g. "AUD".
    pub primary: String,
    /// Asset being bought or sold, e.g. "BTC".
    pub secondary: String,
    /// Order quantity.
    pub quantity: Decimal,
    /// Which asset `quantity` is denominated in.
    pub asset_quantity: String,
    /// Order type, see [`order_types`].
    pub order_type: u8,
    /// Trigger price for trigger/stop orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Decimal>,
}

impl PlaceOrderRequest {
    /// A market buy of `secondary`, spending `quantity` of `primary`.
    pub fn market_buy(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        let primary = primary.into();
        Self {
            asset_quantity: primary.clone(),
            primary,
            secondary: secondary.into(),
            quantity,
            order_type: order_types::MARKET_BUY,
            trigger: None,
        }
    }

    /// A market sell of `quantity` units of `secondary`.
    pub fn market_sell(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        let secondary = secondary.into();
        Self {
            primary: primary.into(),
            asset_quantity: secondary.clone(),
            secondary,
            quantity,
            order_type: order_types::MARKET_SELL,
            trigger: None,
        }
    }

    /// Set a trigger price and the matching order type.
    pub fn with_trigger(mut self, order_type: u8, trigger: Decimal) -> Self {
        self.order_type = order_type;
        self.trigger = Some(trigger);
        self
    }
}

/// Changes to apply to a pending order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    /// New trigger price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Decimal>,
    /// New order quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
}

/// Response to a successful order placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    /// Identifier of the created order.
    pub order_uuid: String,
    /// The created order, when the API echoes it back.
    #[serde(default)]
    pub order: Option<Order>,
}

/// An order as returned by the list and fetch endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    pub order_uuid: Option<String>,
    /// Order type, see [`order_types`].
    pub order_type: Option<u8>,
    /// Primary asset id.
    pub primary_asset: Option<u32>,
    /// Secondary asset id.
    pub secondary_asset: Option<u32>,
    /// Order quantity.
    pub quantity: Option<Decimal>,
    /// Asset id `quantity` is denominated in.
    pub quantity_asset: Option<u32>,
    /// Trigger price, for trigger/stop orders.
    pub trigger: Option<Decimal>,
    /// Numeric order status.
    pub status: Option<u8>,
    /// Creation time, unix milliseconds.
    pub created_time: Option<i64>,
    /// Last update time, unix milliseconds.
    pub updated_time: Option<i64>,
    /// Executed rate, for filled orders.
    pub rate: Option<Decimal>,
}

/// Parameters for an exchange-rate quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateRequest {
    /// Asset being bought.
    pub buy: String,
    /// Asset being sold.
    pub sell: String,
    /// Amount to exchange.
    pub amount: Decimal,
    /// Asset the amount is denominated in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// An exchange-rate quote for a prospective order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Unit price.
    pub price: Decimal,
    /// Total cost at that price.
    pub total: Decimal,
    /// Amount quoted.
    pub amount: Decimal,
    /// Fee per unit, when reported.
    #[serde(default)]
    pub fee_per_unit: Option<Decimal>,
}

/// One entry in the transaction history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Transaction identifier.
    pub uuid: Option<String>,
    /// Kind of transaction, e.g. "deposit" or "withdrawal".
    pub action_type: Option<String>,
    /// Asset id the transaction concerns.
    pub asset: Option<u32>,
    /// Transaction amount.
    pub amount: Option<Decimal>,
    /// Transaction status.
    pub status: Option<String>,
    /// Creation time, unix milliseconds.
    pub created_time: Option<i64>,
}

/// Remaining withdrawal limits for the account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalLimit {
    /// Amount already used in the current cycle.
    pub used: Option<Decimal>,
    /// Amount remaining in the current cycle.
    pub remaining: Option<Decimal>,
    /// Total limit per cycle.
    pub limit: Option<Decimal>,
    /// Length of the rolling cycle in hours.
    pub rolling_cycle_hours: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_deserializes_camel_case() {
        let json = r#"[{"assetId": 1, "availableBalance": "150.25"}]"#;
        let balances: Vec<Balance> = serde_json::from_str(json).unwrap();
        assert_eq!(balances[0].asset_id, 1);
        assert_eq!(balances[0].available_balance, Decimal::new(15025, 2));
    }

    #[test]
    fn test_place_order_request_serializes() {
        let request = PlaceOrderRequest::market_buy("AUD", "BTC", Decimal::new(100, 0));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["primary"], "AUD");
        assert_eq!(json["secondary"], "BTC");
        assert_eq!(json["assetQuantity"], "AUD");
        assert_eq!(json["orderType"], order_types::MARKET_BUY);
        assert!(json.get("trigger").is_none());
    }

    #[test]
    fn test_trigger_order_serializes_trigger() {
        let request = PlaceOrderRequest::market_buy("AUD", "BTC", Decimal::new(100, 0))
            .with_trigger(order_types::TRIGGER_BUY, Decimal::new(95000, 0));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["orderType"], order_types::TRIGGER_BUY);
        // Decimals serialize as strings for lossless precision.
        assert_eq!(json["trigger"], serde_json::json!("95000"));
    }

    #[test]
    fn test_order_tolerates_missing_fields() {
        let json = r#"{"orderUuid": "ord-1", "status": 4}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_uuid.as_deref(), Some("ord-1"));
        assert_eq!(order.status, Some(4));
        assert!(order.trigger.is_none());
    }

    #[test]
    fn test_live_rates_keyed_by_asset_id() {
        let json = r#"{"3": {"buyPrice": "98000.1", "sellPrice": "97800.5"}}"#;
        let rates: LiveRates = serde_json::from_str(json).unwrap();
        let btc = &rates["3"];
        assert!(btc.buy_price.is_some());
        assert!(btc.mid_price.is_none());
    }
}
