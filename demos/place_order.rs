//! Place and cancel a small market order on the demo venue.
//!
//! Usage: SWYFTX_API_KEY=... cargo run --example place_order

use rust_decimal::Decimal;
use swyftx_api_client::rest::types::{ExchangeRateRequest, PlaceOrderRequest};
use swyftx_api_client::{Credentials, Environment, SwyftxClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = SwyftxClient::builder()
        .credentials(Credentials::from_env())
        .environment(Environment::Demo)
        .auto_wait(true)
        .build();

    let quote = client
        .exchange_rate(&ExchangeRateRequest {
            buy: "BTC".to_string(),
            sell: "AUD".to_string(),
            amount: Decimal::new(100, 0),
            limit: None,
        })
        .await?;
    println!("Quote: {} BTC for 100 AUD at {}", quote.amount, quote.price);

    let request = PlaceOrderRequest::market_buy("AUD", "BTC", Decimal::new(100, 0));
    let placed = client.place_order(&request).await?;
    println!("Placed order {}", placed.order_uuid);

    let order = client.order(&placed.order_uuid).await?;
    println!("Order status: {:?}", order.status);

    client.cancel_order(&placed.order_uuid).await?;
    println!("Cancelled");

    Ok(())
}
