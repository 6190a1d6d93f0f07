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

//! Boundary to the device transport.
//!
//! The transport owns the radio link and the encrypted framing. It talks to
//! a session through two channels: events flow in, datapoint commands flow out.

mod loopback;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::device::{Datapoint, DatapointType, DatapointValue};
use crate::error::DatapointError;

pub use loopback::LoopbackTransport;

/// Capacity of the transport event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Events delivered by the transport, in order.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Link established.
    Connected,
    /// The device reported one or more datapoints.
    DatapointsUpdated(Vec<Datapoint>),
    /// Link lost.
    Disconnected,
}

/// A datapoint write handed to the transport.
#[derive(Debug)]
pub struct DatapointCommand {
    pub id: u8,
    pub dp_type: DatapointType,
    pub value: DatapointValue,
    pub ack: oneshot::Sender<Result<(), DatapointError>>,
}

impl DatapointCommand {
    /// Report the outcome of the write to whoever issued it.
    pub fn complete(self, result: Result<(), DatapointError>) {
        if self.ack.send(result).is_err() {
            debug!("Nobody waiting on write to datapoint {}", self.id);
        }
    }
}

/// Session side of the transport boundary.
pub struct TransportLink {
    pub events: mpsc::Receiver<TransportEvent>,
    pub commands: mpsc::UnboundedSender<DatapointCommand>,
}

/// Transport side of the boundary.
pub struct TransportEndpoint {
    pub events: mpsc::Sender<TransportEvent>,
    pub commands: mpsc::UnboundedReceiver<DatapointCommand>,
}

/// Create a connected link/endpoint pair.
pub fn channel() -> (TransportLink, TransportEndpoint) {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    (
        TransportLink {
            events: event_rx,
            commands: command_tx,
        },
        TransportEndpoint {
            events: event_tx,
            commands: command_rx,
        },
    )
}
