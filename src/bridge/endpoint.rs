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

//! Method dispatch for the application layer.

use tracing::{debug, error, warn};

use super::protocol::{MethodCall, MethodResponse};
use super::result::PendingResult;
use crate::error::BridgeError;
use crate::permission::BrokerHandle;

/// Methods understood by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeMethod {
    RequestBluetoothConnectPermission,
}

impl BridgeMethod {
    /// Parse from a method name. Names are case sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "requestBluetoothConnectPermission" => Some(Self::RequestBluetoothConnectPermission),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestBluetoothConnectPermission => "requestBluetoothConnectPermission",
        }
    }
}

/// Receives method calls on one channel and forwards them to the broker.
pub struct BridgeEndpoint {
    channel: String,
    broker: BrokerHandle,
}

impl BridgeEndpoint {
    pub fn new(channel: impl Into<String>, broker: BrokerHandle) -> Self {
        Self {
            channel: channel.into(),
            broker,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Dispatch a call. `result` is answered exactly once, possibly long
    /// after this returns.
    pub async fn on_method_call(&self, call: &MethodCall, result: PendingResult) {
        if let Some(channel) = call.channel.as_deref() {
            if channel != self.channel {
                warn!("Call {} addressed to unknown channel '{}'", call.id, channel);
                result.not_implemented();
                return;
            }
        }

        match BridgeMethod::parse(&call.method) {
            Some(method @ BridgeMethod::RequestBluetoothConnectPermission) => {
                debug!("Call {}: {}", call.id, method.as_str());
                if let Err(e) = self.broker.request(result).await {
                    error!("Call {} could not reach the broker: {}", call.id, e);
                }
            }
            None => {
                warn!("{}", BridgeError::NotImplemented(call.method.clone()));
                result.not_implemented();
            }
        }
    }

    /// Dispatch a call and wait for its response.
    pub async fn invoke(&self, call: &MethodCall) -> MethodResponse {
        let (result, rx) = PendingResult::new(call.id);
        self.on_method_call(call, result).await;
        // A dropped handle means the broker went away mid-request.
        rx.await
            .unwrap_or_else(|_| MethodResponse::from_error(&BridgeError::BrokerClosed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::DEFAULT_CHANNEL;
    use crate::permission::{self, BrokeredPermission, PermissionBroker};
    use crate::platform::SimulatedPlatform;
    use crate::state::BridgeStatus;

    fn endpoint(sdk_version: u32) -> (BridgeEndpoint, std::sync::Arc<SimulatedPlatform>) {
        let platform = SimulatedPlatform::new(sdk_version);
        let broker = PermissionBroker::new(
            platform.clone(),
            BrokeredPermission::bluetooth_connect(),
            BridgeStatus::new(),
        );
        let (handle, _task) = permission::spawn(broker, 8);
        (BridgeEndpoint::new(DEFAULT_CHANNEL, handle), platform)
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            BridgeMethod::parse("requestBluetoothConnectPermission"),
            Some(BridgeMethod::RequestBluetoothConnectPermission)
        );
        assert_eq!(BridgeMethod::parse("RequestBluetoothConnectPermission"), None);
        assert_eq!(BridgeMethod::parse(""), None);
        assert_eq!(
            BridgeMethod::RequestBluetoothConnectPermission.as_str(),
            "requestBluetoothConnectPermission"
        );
    }

    #[tokio::test]
    async fn test_unknown_method_is_not_implemented() {
        let (endpoint, platform) = endpoint(33);
        let response = endpoint.invoke(&MethodCall::new(1, "enableBluetooth")).await;
        assert!(response.is_not_implemented());
        assert_eq!(response.as_bool(), None);
        assert_eq!(platform.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_implemented() {
        let (endpoint, platform) = endpoint(30);
        let call = MethodCall::new(1, "requestBluetoothConnectPermission").on_channel("other/channel");
        assert!(endpoint.invoke(&call).await.is_not_implemented());
        assert_eq!(platform.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_known_method_on_own_channel() {
        let (endpoint, _) = endpoint(30);
        assert_eq!(endpoint.channel(), DEFAULT_CHANNEL);

        let call = MethodCall::new(1, "requestBluetoothConnectPermission").on_channel(DEFAULT_CHANNEL);
        assert_eq!(endpoint.invoke(&call).await, MethodResponse::success(true));

        let call = MethodCall::new(2, "requestBluetoothConnectPermission");
        assert_eq!(endpoint.invoke(&call).await, MethodResponse::success(true));
    }
}
