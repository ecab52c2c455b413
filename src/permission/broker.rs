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

//! Permission request state machine.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gate::{BrokeredPermission, PermissionState};
use crate::bridge::PendingResult;
use crate::error::BridgeError;
use crate::platform::{PermissionPlatform, PermissionsResult, RequestCode};
use crate::state::BridgeStatus;

/// The caller waiting on an issued prompt.
#[derive(Debug)]
pub struct PendingRequest {
    pub request_code: RequestCode,
    pub result: PendingResult,
    pub issued_at: DateTime<Local>,
}

/// Broker state. At most one prompt is ever outstanding.
#[derive(Debug, Default)]
pub enum BrokerState {
    #[default]
    Idle,
    AwaitingPrompt(PendingRequest),
}

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Answered immediately with this value.
    Resolved(bool),
    /// A prompt was issued; the answer follows the callback.
    Prompted,
    /// Turned away because another prompt is outstanding.
    Rejected,
}

/// Decides whether the permission is usable and obtains it if needed.
pub struct PermissionBroker {
    platform: Arc<dyn PermissionPlatform>,
    permission: BrokeredPermission,
    state: BrokerState,
    status: Arc<BridgeStatus>,
}

impl PermissionBroker {
    pub fn new(
        platform: Arc<dyn PermissionPlatform>,
        permission: BrokeredPermission,
        status: Arc<BridgeStatus>,
    ) -> Self {
        Self {
            platform,
            permission,
            state: BrokerState::Idle,
            status,
        }
    }

    pub fn permission(&self) -> &BrokeredPermission {
        &self.permission
    }

    pub fn is_awaiting_prompt(&self) -> bool {
        matches!(self.state, BrokerState::AwaitingPrompt(_))
    }

    /// Handle a permission request whose answer goes to `result`.
    pub fn request(&mut self, result: PendingResult) -> RequestOutcome {
        let state = self.permission.state(self.platform.as_ref());
        if !state.is_usable() {
            return self.prompt(result);
        }

        if state == PermissionState::NotApplicable {
            debug!(
                "{} does not exist before SDK {}, treating as granted",
                self.permission.name, self.permission.min_sdk
            );
        } else {
            debug!("{} already granted", self.permission.name);
        }
        self.status.record_answer(true);
        result.success(true);
        RequestOutcome::Resolved(true)
    }

    fn prompt(&mut self, result: PendingResult) -> RequestOutcome {
        if let BrokerState::AwaitingPrompt(pending) = &self.state {
            warn!(
                "Rejecting call {}: prompt {} issued at {} is still open",
                result.call_id(),
                pending.request_code,
                pending.issued_at.format("%H:%M:%S")
            );
            result.error(&BridgeError::RequestInProgress(pending.request_code));
            self.status.record_rejected();
            return RequestOutcome::Rejected;
        }

        let request_code = self.permission.request_code;
        info!(
            "Prompting for {} (call {}, request code {})",
            self.permission.name,
            result.call_id(),
            request_code
        );

        self.state = BrokerState::AwaitingPrompt(PendingRequest {
            request_code,
            result,
            issued_at: Local::now(),
        });
        self.status.set_awaiting_prompt();
        self.platform
            .request_permissions(&[self.permission.name.as_str()], request_code);

        RequestOutcome::Prompted
    }

    /// Handle the OS callback for a prompt.
    ///
    /// Returns `true` if a waiting caller was answered. Foreign request codes
    /// and callbacks with nobody waiting are ignored.
    pub fn on_request_permissions_result(&mut self, result: PermissionsResult) -> bool {
        if result.request_code != self.permission.request_code {
            debug!("Ignoring permission result for request code {}", result.request_code);
            return false;
        }

        let granted = result.first_granted();
        match std::mem::take(&mut self.state) {
            BrokerState::AwaitingPrompt(pending) => {
                info!(
                    "{} {} by user",
                    self.permission.name,
                    if granted { "granted" } else { "not granted" }
                );
                self.status.record_resolution(granted);
                pending.result.success(granted);
                true
            }
            BrokerState::Idle => {
                debug!(
                    "Permission result for request code {} with no pending request",
                    result.request_code
                );
                false
            }
        }
    }
}
