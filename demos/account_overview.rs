//! Fetch account balances and recent history from the demo venue.
//!
//! Usage: SWYFTX_API_KEY=... cargo run --example account_overview

use swyftx_api_client::{Credentials, Environment, QueryParams, SwyftxClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = SwyftxClient::builder()
        .credentials(Credentials::from_env())
        .environment(Environment::Demo)
        .build();

    let profile = client.profile().await?;
    println!("Profile: {:?}", profile.name);

    let balances = client.balances().await?;
    for balance in &balances {
        println!(
            "asset {} -> {} available",
            balance.asset_id, balance.available_balance
        );
    }

    let query = QueryParams::new().limit(Some(10)).sort_by(Some("date"));
    let history = client.transaction_history(&query).await?;
    println!("{} recent transactions", history.len());

    let limits = client.withdrawal_limits().await?;
    println!("Withdrawal limits: {:?}", limits);

    Ok(())
}
