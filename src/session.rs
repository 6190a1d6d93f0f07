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

//! One device session: datapoint store, coordinator and the task that feeds
//! them from the transport.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::catalog::{self, ProductInfo};
use crate::config::SessionConfig;
use crate::coordinator::{Coordinator, DeviceEvent};
use crate::device::{DatapointStore, Device, DeviceInfo};
use crate::transport::{TransportEvent, TransportLink};

/// A running device session.
pub struct DeviceSession {
    coordinator: Arc<Coordinator>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl DeviceSession {
    /// Start a session for `info` on the current tokio runtime.
    pub fn start(
        info: DeviceInfo,
        link: TransportLink,
        config: &SessionConfig,
    ) -> Result<Arc<Self>> {
        let runtime = Handle::try_current()
            .context("Device session must be started inside a tokio runtime")?;

        let TransportLink { events, commands } = link;
        let product = catalog::device_product_info(&info);
        match product {
            Some(p) => info!("Starting session for {} ({})", info.device_id, p.name),
            None => info!(
                "Starting session for {} (unknown product {}/{})",
                info.device_id, info.category, info.product_id
            ),
        }

        let device = Arc::new(Device::new(info, DatapointStore::new(commands)));
        let coordinator =
            Coordinator::new(device, product, config.disconnect_delay(), runtime.clone());

        let pump = runtime.spawn(pump_events(coordinator.clone(), events));

        Ok(Arc::new(Self {
            coordinator,
            pump: Mutex::new(Some(pump)),
        }))
    }

    pub fn device(&self) -> &Arc<Device> {
        self.coordinator.device()
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn product(&self) -> Option<&'static ProductInfo> {
        self.coordinator.product()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.coordinator.subscribe()
    }

    /// Cancel the disconnect timer and stop processing transport events.
    /// Surfaces read unavailable afterwards. Writes already handed to the
    /// transport finish on their own.
    pub fn shutdown(&self) {
        self.coordinator.shutdown();
        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
            info!("Session for {} stopped", self.device().device_id());
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Apply transport events in order.
async fn pump_events(coordinator: Arc<Coordinator>, mut events: mpsc::Receiver<TransportEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Connected => coordinator.handle_connected(),
            TransportEvent::DatapointsUpdated(updates) => {
                coordinator.device().datapoints().apply_updates(&updates);
                coordinator.handle_update(&updates);
            }
            TransportEvent::Disconnected => coordinator.handle_disconnected(),
        }
    }
    debug!(
        "Transport for {} closed its event channel",
        coordinator.device().device_id()
    );
}
