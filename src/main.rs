// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! BLE Beacon: advertise a single GATT service over BlueZ.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zbus::Connection;

use ble_beacon::bluetooth::{
    AdvertisementDescriptor, Dispatcher, ObjectProperties, RegistrationClient, ServiceDescriptor,
};
use ble_beacon::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ble_beacon=info".parse().unwrap()),
        )
        .init();

    info!("Starting BLE Beacon v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded");

    // Connect to the system bus BlueZ lives on
    let conn = Connection::system().await?;
    info!("Connected to system bus");

    // Build the exported objects
    let service = ServiceDescriptor::new(0);
    let advertisement = AdvertisementDescriptor::new(0)
        .with_local_name(&config.advertising.local_name)
        .with_include_tx_power(config.advertising.include_tx_power);
    info!(
        "Advertising '{}' with service {}",
        config.advertising.local_name,
        service.uuid()
    );

    // Build the dispatcher first: it subscribes to bus traffic on
    // construction, so the property queries BlueZ issues in response to the
    // registration below are queued rather than missed.
    let advertisement_path = advertisement.object_path().clone();
    let (outcome_tx, outcome_rx) = tokio::sync::mpsc::channel(8);
    let dispatcher = Dispatcher::new(conn.clone(), service, advertisement, outcome_rx);

    // Submit the advertisement; the outcome arrives on the dispatcher queue
    let client = RegistrationClient::new(conn, config.adapter_path.clone());
    client.register(advertisement_path, outcome_tx);

    // Serve property queries until Ctrl+C
    dispatcher.run().await?;

    info!("BLE Beacon stopped");
    Ok(())
}
