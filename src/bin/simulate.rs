//! `barbershop-sim`: run one simulated day at the shop and print the report.
//!
//! Configuration comes from the JSON file named by `BARBERSHOP_CONFIG`, or
//! else from `BARBERSHOP_*` variables. A `.env` file in the working directory
//! is loaded first.

use std::fs;

use anyhow::{anyhow, Context};
use tracing::info;

use barbershop::builders::BarberShopBuilder;
use barbershop::config::ShopConfig;
use barbershop::core::AppResult;
use barbershop::infra::{SimulatedService, TracingEventSink};
use barbershop::util::init_tracing;

fn load_config() -> AppResult<ShopConfig> {
    match std::env::var("BARBERSHOP_CONFIG") {
        Ok(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            ShopConfig::from_json_str(&raw)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("invalid config file {path}"))
        }
        Err(_) => ShopConfig::from_env()
            .map_err(|e| anyhow!(e))
            .context("invalid BARBERSHOP_* environment"),
    }
}

fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = load_config()?;
    info!(?config, "configuration loaded");

    let shop = BarberShopBuilder::new(config.clone())
        .with_executor(SimulatedService::new(config.service_time_unit_ms))
        .with_sink(TracingEventSink)
        .build()
        .context("building shop")?;
    let report = shop.run().context("running shop")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing report")?
    );
    Ok(())
}
