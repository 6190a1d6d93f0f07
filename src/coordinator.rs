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

//! Connection liveness for one device.
//!
//! A transport disconnect does not make the device unavailable right away.
//! It arms a timer; only when the timer runs out without a reconnect (or a
//! datapoint update, which implies one) does the device read as
//! disconnected. This keeps surfaces from flapping on short radio drops.

use bluer::Address;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::catalog::ProductInfo;
use crate::device::{Datapoint, Device, PendingWrite};
use crate::error::DatapointError;

/// Default delay before a transport disconnect becomes visible.
pub const DEFAULT_DISCONNECT_DELAY: Duration = Duration::from_secs(10);

/// Capacity of the domain event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events published by a coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Externally visible availability changed.
    AvailabilityChanged { device_id: String, connected: bool },
    /// The device reported new datapoint values.
    DatapointsUpdated { device_id: String, ids: Vec<u8> },
    /// Someone pressed the fingerbot by hand.
    FingerbotButtonPressed { address: Address, device_id: String },
    /// The transport failed or the device refused a write.
    WriteFailed {
        device_id: String,
        id: u8,
        error: DatapointError,
    },
}

/// Pending transition to disconnected.
struct DisconnectTimer {
    generation: u64,
    task: AbortHandle,
}

impl DisconnectTimer {
    fn cancel(self) {
        self.task.abort();
    }
}

struct LinkState {
    disconnected: bool,
    pending: Option<DisconnectTimer>,
    /// Bumped on every arm so a timer that fires after being cancelled is ignored.
    generation: u64,
    closed: bool,
}

/// Tracks whether a device counts as connected.
pub struct Coordinator {
    device: Arc<Device>,
    product: Option<&'static ProductInfo>,
    disconnect_delay: Duration,
    runtime: Handle,
    events: broadcast::Sender<DeviceEvent>,
    state: Mutex<LinkState>,
}

impl Coordinator {
    /// Create a coordinator in the disconnected state.
    ///
    /// Timers and write tracking run on `runtime`.
    pub fn new(
        device: Arc<Device>,
        product: Option<&'static ProductInfo>,
        disconnect_delay: Duration,
        runtime: Handle,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            device,
            product,
            disconnect_delay,
            runtime,
            events,
            state: Mutex::new(LinkState {
                disconnected: true,
                pending: None,
                generation: 0,
                closed: false,
            }),
        })
    }

    /// Whether the device currently counts as connected.
    pub fn connected(&self) -> bool {
        !self.state.lock().disconnected
    }

    /// Whether a disconnect is waiting out its delay.
    pub fn disconnect_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn product(&self) -> Option<&'static ProductInfo> {
        self.product
    }

    /// Receive domain events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: DeviceEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Transport reports the link as up.
    pub fn handle_connected(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        if let Some(timer) = state.pending.take() {
            debug!(
                "Device {} reconnected within the disconnect delay",
                self.device.device_id()
            );
            timer.cancel();
        }
        if state.disconnected {
            state.disconnected = false;
            drop(state);
            info!("Device {} connected", self.device.device_id());
            self.emit(DeviceEvent::AvailabilityChanged {
                device_id: self.device.device_id().to_string(),
                connected: true,
            });
        }
    }

    /// Transport delivered datapoint updates. These are already in the store.
    pub fn handle_update(&self, updates: &[Datapoint]) {
        if self.state.lock().closed {
            return;
        }
        self.handle_connected();

        self.emit(DeviceEvent::DatapointsUpdated {
            device_id: self.device.device_id().to_string(),
            ids: updates.iter().map(|dp| dp.id).collect(),
        });

        let Some(fingerbot) = self.product.and_then(|p| p.fingerbot.as_ref()) else {
            return;
        };
        if !fingerbot.has_manual_control() {
            return;
        }
        for update in updates {
            if update.id == fingerbot.switch && update.changed_by_device {
                info!("Fingerbot {} pressed by hand", self.device.device_id());
                self.emit(DeviceEvent::FingerbotButtonPressed {
                    address: self.device.address(),
                    device_id: self.device.device_id().to_string(),
                });
            }
        }
    }

    /// Transport reports the link as down. Arms the disconnect timer unless
    /// one is already pending.
    pub fn handle_disconnected(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.closed || state.pending.is_some() {
            return;
        }
        if state.disconnected {
            debug!(
                "Device {} already disconnected",
                self.device.device_id()
            );
            return;
        }

        state.generation += 1;
        let generation = state.generation;
        let coordinator = Arc::downgrade(self);
        let delay = self.disconnect_delay;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(coordinator) = Weak::upgrade(&coordinator) {
                coordinator.set_disconnected(generation);
            }
        });
        state.pending = Some(DisconnectTimer {
            generation,
            task: task.abort_handle(),
        });
        debug!(
            "Device {} link lost, marking disconnected in {:?}",
            self.device.device_id(),
            delay
        );
    }

    fn set_disconnected(&self, generation: u64) {
        let mut state = self.state.lock();
        match &state.pending {
            Some(timer) if timer.generation == generation => {}
            _ => return,
        }
        state.pending = None;
        state.disconnected = true;
        drop(state);

        info!("Device {} disconnected", self.device.device_id());
        self.emit(DeviceEvent::AvailabilityChanged {
            device_id: self.device.device_id().to_string(),
            connected: false,
        });
    }

    /// Stop reacting to transport callbacks, cancel any pending timer and
    /// read as disconnected from now on.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.disconnected = true;
        if let Some(timer) = state.pending.take() {
            timer.cancel();
        }
    }

    /// Follow a write on the coordinator's runtime. Failures are logged and
    /// published as [`DeviceEvent::WriteFailed`].
    pub fn track_write(&self, write: PendingWrite) {
        let device_id = self.device.device_id().to_string();
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let id = write.id();
            match write.await {
                Ok(()) => debug!("Device {}: datapoint {} written", device_id, id),
                Err(error) => {
                    warn!("Device {}: write failed: {}", device_id, error);
                    let _ = events.send(DeviceEvent::WriteFailed {
                        device_id,
                        id,
                        error,
                    });
                }
            }
        });
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().pending.take() {
            timer.cancel();
        }
    }
}
