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

//! Simulated transport that acknowledges writes and echoes them back.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{DatapointCommand, TransportEndpoint, TransportEvent};
use crate::device::Datapoint;
use crate::error::DatapointError;

/// Transport stand-in for running without a radio.
///
/// Reports a connection right away, then answers each command after
/// `latency` with an ack and an update carrying the written value. Writes
/// to read-only datapoints, or with a value the datapoint type cannot
/// carry, are rejected the way a device would refuse them.
pub struct LoopbackTransport {
    latency: Duration,
    initial: Vec<Datapoint>,
    read_only: Vec<u8>,
}

impl LoopbackTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            initial: Vec::new(),
            read_only: Vec::new(),
        }
    }

    /// Datapoints reported right after connecting.
    pub fn with_initial(mut self, datapoints: Vec<Datapoint>) -> Self {
        self.initial = datapoints;
        self
    }

    /// Datapoints the simulated device refuses to have written.
    pub fn with_read_only(mut self, ids: Vec<u8>) -> Self {
        self.read_only = ids;
        self
    }

    fn check(&self, command: &DatapointCommand) -> Result<(), DatapointError> {
        let reason = if self.read_only.contains(&command.id) {
            "read-only datapoint".to_string()
        } else if !command.dp_type.accepts(&command.value) {
            format!("{} is not a valid {:?} value", command.value, command.dp_type)
        } else {
            return Ok(());
        };
        Err(DatapointError::Rejected {
            id: command.id,
            reason,
        })
    }

    /// Run the transport on its own task until the session goes away.
    pub fn spawn(self, endpoint: TransportEndpoint) -> JoinHandle<()> {
        tokio::spawn(self.run(endpoint))
    }

    async fn run(self, mut endpoint: TransportEndpoint) {
        info!("Loopback transport started (latency {:?})", self.latency);

        if endpoint.events.send(TransportEvent::Connected).await.is_err() {
            return;
        }
        if !self.initial.is_empty() {
            let initial = TransportEvent::DatapointsUpdated(self.initial.clone());
            if endpoint.events.send(initial).await.is_err() {
                return;
            }
        }

        while let Some(command) = endpoint.commands.recv().await {
            tokio::time::sleep(self.latency).await;
            if let Err(e) = self.check(&command) {
                warn!("Loopback refused write: {}", e);
                command.complete(Err(e));
                continue;
            }
            debug!("Loopback echo of datapoint {} = {}", command.id, command.value);

            let echo = Datapoint::new(command.id, command.dp_type, command.value.clone());
            command.complete(Ok(()));
            if endpoint
                .events
                .send(TransportEvent::DatapointsUpdated(vec![echo]))
                .await
                .is_err()
            {
                break;
            }
        }

        info!("Loopback transport stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DatapointStore, DatapointType, DatapointValue};
    use crate::transport::channel;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_loopback_echoes_writes() {
        let (mut link, endpoint) = channel();
        let initial = Datapoint::new(1, DatapointType::Bool, DatapointValue::Bool(false));
        LoopbackTransport::new(Duration::from_millis(1))
            .with_initial(vec![initial])
            .spawn(endpoint);

        assert!(matches!(link.events.recv().await, Some(TransportEvent::Connected)));
        match link.events.recv().await {
            Some(TransportEvent::DatapointsUpdated(dps)) => assert_eq!(dps[0].id, 1),
            other => panic!("unexpected event: {:?}", other),
        }

        let store = DatapointStore::new(link.commands.clone());
        store.get_or_create(1, DatapointType::Bool, DatapointValue::Bool(false));
        let pending = store.set_value(1, DatapointValue::Bool(true));
        assert_eq!(pending.await, Ok(()));

        match link.events.recv().await {
            Some(TransportEvent::DatapointsUpdated(dps)) => {
                assert_eq!(dps.len(), 1);
                assert_eq!(dps[0].value, DatapointValue::Bool(true));
                assert!(!dps[0].changed_by_device);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loopback_rejects_refused_writes() {
        let (mut link, endpoint) = channel();
        LoopbackTransport::new(Duration::from_millis(1))
            .with_read_only(vec![47])
            .spawn(endpoint);
        assert!(matches!(link.events.recv().await, Some(TransportEvent::Connected)));

        let store = DatapointStore::new(link.commands.clone());
        store.get_or_create(47, DatapointType::Bool, DatapointValue::Bool(false));
        assert!(matches!(
            store.set_value(47, DatapointValue::Bool(true)).await,
            Err(DatapointError::Rejected { id: 47, .. })
        ));

        // A command the device cannot decode, sent past the store's checks.
        let (ack, rx) = oneshot::channel();
        link.commands
            .send(DatapointCommand {
                id: 3,
                dp_type: DatapointType::Bool,
                value: DatapointValue::Integer(7),
                ack,
            })
            .unwrap();
        assert!(matches!(
            rx.await.unwrap(),
            Err(DatapointError::Rejected { id: 3, .. })
        ));

        // Nothing was echoed for either write.
        assert!(link.events.try_recv().is_err());
    }
}
