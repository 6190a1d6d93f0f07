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

//! Tuya BLE bridge console

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tuyable_bridge::config::Config;
use tuyable_bridge::console::ConsoleCommand;
use tuyable_bridge::coordinator::DeviceEvent;
use tuyable_bridge::device::{self, CredentialSource, DeviceInfo};
use tuyable_bridge::session::DeviceSession;
use tuyable_bridge::transport::{self, LoopbackTransport};
use tuyable_bridge::{catalog, setup};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tuyable_bridge=info".parse()?),
        )
        .init();

    info!("Starting tuyable-bridge v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded ({} devices)", config.devices.len());

    // Pick the device: CLI argument first, else the first configured one
    let address = match std::env::args().nth(1) {
        Some(arg) => device::parse_address(&arg)?,
        None => {
            let first = config.devices.first().ok_or_else(|| {
                anyhow!(
                    "No devices configured; add one to {}",
                    Config::default_path().display()
                )
            })?;
            device::parse_address(&first.address)?
        }
    };
    let credentials = config
        .credentials(&address)
        .with_context(|| format!("No credentials for {}", address))?;
    let info = DeviceInfo::from_credentials(address, &credentials);
    let product = catalog::device_product_info(&info);

    // Start the transport and the session
    let (link, endpoint) = transport::channel();
    let transport_task = LoopbackTransport::new(config.transport.loopback_latency())
        .with_read_only(config.transport.loopback_read_only.clone())
        .spawn(endpoint);
    let session = DeviceSession::start(info, link, &config.session)?;
    let surfaces = setup::setup_surfaces(&session);

    info!(
        "Device {} ready with {} surfaces",
        device::readable_name(&address, product, Some(&credentials), &credentials.device_name),
        surfaces.len()
    );

    // Log domain events
    let mut events = session.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(DeviceEvent::AvailabilityChanged { device_id, connected }) => {
                    info!(
                        "Device {} is {}",
                        device_id,
                        if connected { "available" } else { "unavailable" }
                    );
                }
                Ok(DeviceEvent::DatapointsUpdated { device_id, ids }) => {
                    info!("Device {} updated datapoints {:?}", device_id, ids);
                }
                Ok(DeviceEvent::FingerbotButtonPressed { address, device_id }) => {
                    info!("Fingerbot {} ({}) pressed by hand", device_id, address);
                }
                Ok(DeviceEvent::WriteFailed { device_id, id, error }) => {
                    error!("Device {}: datapoint {} not written: {}", device_id, id, error);
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Event log fell behind, {} events missed", missed);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    info!("Ready. Commands: on/off/toggle/press <key>, list, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Console closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(command) => match command.execute(&surfaces) {
                        Ok(output) => println!("{}", output),
                        Err(e) => error!("{}", e),
                    },
                    None => warn!("Unknown command: {}", line.trim()),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    session.shutdown();
    transport_task.abort();
    info!("tuyable-bridge stopped");
    Ok(())
}
