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

//! Broker task and the handle used to reach it.
//!
//! The broker is owned by a single task. Requests from the bridge and
//! callbacks from the platform both arrive as [`BrokerCommand`]s, so the
//! pending slot is only ever touched from that task.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::broker::PermissionBroker;
use crate::bridge::PendingResult;
use crate::error::BridgeError;
use crate::platform::PermissionsResult;

/// Messages processed by the broker task.
#[derive(Debug)]
pub enum BrokerCommand {
    /// Permission requested; answer goes to the handle.
    Request(PendingResult),
    /// OS reported the outcome of a prompt.
    PermissionsResult(PermissionsResult),
}

/// Cloneable sender side of the broker task.
#[derive(Debug, Clone)]
pub struct BrokerHandle {
    tx: mpsc::Sender<BrokerCommand>,
}

impl BrokerHandle {
    /// Forward a request. If the broker is gone the handle is answered with
    /// [`BridgeError::BrokerClosed`] before the error is returned.
    pub async fn request(&self, result: PendingResult) -> Result<(), BridgeError> {
        let Err(mpsc::error::SendError(command)) =
            self.tx.send(BrokerCommand::Request(result)).await
        else {
            return Ok(());
        };
        if let BrokerCommand::Request(result) = command {
            result.error(&BridgeError::BrokerClosed);
        }
        Err(BridgeError::BrokerClosed)
    }

    /// Deliver a platform callback to the broker.
    pub async fn on_request_permissions_result(
        &self,
        result: PermissionsResult,
    ) -> Result<(), BridgeError> {
        self.tx
            .send(BrokerCommand::PermissionsResult(result))
            .await
            .map_err(|_| BridgeError::BrokerClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Start the broker task.
///
/// The task runs until every [`BrokerHandle`] is dropped.
pub fn spawn(broker: PermissionBroker, queue_depth: usize) -> (BrokerHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(queue_depth.max(1));
    let task = tokio::spawn(run(broker, rx));
    (BrokerHandle { tx }, task)
}

async fn run(mut broker: PermissionBroker, mut rx: mpsc::Receiver<BrokerCommand>) {
    info!("Permission broker started for {}", broker.permission().name);

    while let Some(command) = rx.recv().await {
        match command {
            BrokerCommand::Request(result) => {
                let call_id = result.call_id();
                let outcome = broker.request(result);
                debug!("Call {} -> {:?}", call_id, outcome);
            }
            BrokerCommand::PermissionsResult(result) => {
                broker.on_request_permissions_result(result);
            }
        }
    }

    if broker.is_awaiting_prompt() {
        info!("Permission broker stopping with a prompt still open");
    }
    info!("Permission broker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MethodResponse;
    use crate::permission::{BrokeredPermission, BLUETOOTH_CONNECT, REQ_BLUETOOTH_CONNECT};
    use crate::platform::{GrantResult, SimulatedPlatform};
    use crate::state::BridgeStatus;

    #[tokio::test]
    async fn test_request_and_callback_through_task() {
        let platform = SimulatedPlatform::new(33);
        let mut prompts = platform.subscribe();
        let broker = PermissionBroker::new(
            platform.clone(),
            BrokeredPermission::bluetooth_connect(),
            BridgeStatus::new(),
        );
        let (handle, _task) = spawn(broker, 8);

        let (result, rx) = PendingResult::new(1);
        handle.request(result).await.unwrap();

        let prompt = prompts.recv().await.unwrap();
        assert_eq!(prompt.request_code, REQ_BLUETOOTH_CONNECT);

        handle
            .on_request_permissions_result(PermissionsResult::new(
                prompt.request_code,
                vec![BLUETOOTH_CONNECT.to_string()],
                vec![GrantResult::Granted],
            ))
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap(), MethodResponse::success(true));
    }

    #[tokio::test]
    async fn test_closed_broker_answers_request() {
        let platform = SimulatedPlatform::new(33);
        let broker = PermissionBroker::new(
            platform,
            BrokeredPermission::bluetooth_connect(),
            BridgeStatus::new(),
        );
        let (handle, task) = spawn(broker, 8);
        task.abort();
        let _ = task.await;
        assert!(handle.is_closed());

        let (result, rx) = PendingResult::new(1);
        assert_eq!(handle.request(result).await, Err(BridgeError::BrokerClosed));

        match rx.await.unwrap() {
            MethodResponse::Error { code, .. } => assert_eq!(code, "BROKER_CLOSED"),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
