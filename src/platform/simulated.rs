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

//! In-process stand-in for the OS permission subsystem.

use chrono::{DateTime, Local};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{GrantResult, PermissionPlatform, PermissionsResult, RequestCode};
use crate::permission::BrokerHandle;

/// A prompt the platform was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub permissions: Vec<String>,
    pub request_code: RequestCode,
    pub shown_at: DateTime<Local>,
}

/// Simulated platform with a configurable SDK version and grant set.
///
/// Every prompt is recorded and, if someone subscribed, published so a
/// [`PromptResponder`] (or a test) can answer it.
#[derive(Debug)]
pub struct SimulatedPlatform {
    sdk_version: RwLock<u32>,
    granted: RwLock<HashSet<String>>,
    prompts: Mutex<Vec<PromptRecord>>,
    prompt_tx: Mutex<Option<mpsc::UnboundedSender<PromptRecord>>>,
}

impl SimulatedPlatform {
    pub fn new(sdk_version: u32) -> Arc<Self> {
        Arc::new(Self {
            sdk_version: RwLock::new(sdk_version),
            granted: RwLock::new(HashSet::new()),
            prompts: Mutex::new(Vec::new()),
            prompt_tx: Mutex::new(None),
        })
    }

    pub fn set_sdk_version(&self, sdk_version: u32) {
        *self.sdk_version.write() = sdk_version;
    }

    /// Mark a permission as granted, as if the user allowed it earlier.
    pub fn grant(&self, permission: &str) {
        self.granted.write().insert(permission.to_string());
    }

    pub fn revoke(&self, permission: &str) {
        self.granted.write().remove(permission);
    }

    /// All prompts shown so far, oldest first.
    pub fn prompts(&self) -> Vec<PromptRecord> {
        self.prompts.lock().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Receive every prompt issued from now on. Replaces any earlier subscriber.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<PromptRecord> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.prompt_tx.lock() = Some(tx);
        rx
    }
}

impl PermissionPlatform for SimulatedPlatform {
    fn sdk_version(&self) -> u32 {
        *self.sdk_version.read()
    }

    fn check_self_permission(&self, permission: &str) -> GrantResult {
        GrantResult::from(self.granted.read().contains(permission))
    }

    fn request_permissions(&self, permissions: &[&str], request_code: RequestCode) {
        let record = PromptRecord {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            request_code,
            shown_at: Local::now(),
        };
        info!(
            "Showing permission prompt for {:?} (request code {})",
            record.permissions, request_code
        );

        self.prompts.lock().push(record.clone());

        if let Some(tx) = self.prompt_tx.lock().as_ref() {
            if tx.send(record).is_err() {
                debug!("Prompt subscriber is gone, nobody will answer");
            }
        }
    }
}

/// How the simulated user reacts to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserResponse {
    /// Allow every requested permission.
    #[default]
    Allow,
    /// Deny every requested permission.
    Deny,
    /// Close the dialog without choosing; the OS reports no results.
    Dismiss,
    /// Leave the dialog open forever.
    Ignore,
}

impl UserResponse {
    /// Grant results reported for `count` requested permissions, or `None`
    /// when the user never answers.
    pub fn grant_results(&self, count: usize) -> Option<Vec<GrantResult>> {
        match self {
            Self::Allow => Some(vec![GrantResult::Granted; count]),
            Self::Deny => Some(vec![GrantResult::Denied; count]),
            Self::Dismiss => Some(Vec::new()),
            Self::Ignore => None,
        }
    }
}

/// Plays the user for a [`SimulatedPlatform`].
pub struct PromptResponder {
    platform: Arc<SimulatedPlatform>,
    response: UserResponse,
    delay: Duration,
}

impl PromptResponder {
    pub fn new(platform: Arc<SimulatedPlatform>, response: UserResponse, delay: Duration) -> Self {
        Self {
            platform,
            response,
            delay,
        }
    }

    /// Build the callback the OS would deliver for `prompt`, applying any
    /// grant to the platform first. `None` means the prompt stays open.
    pub fn answer(&self, prompt: &PromptRecord) -> Option<PermissionsResult> {
        let grant_results = self.response.grant_results(prompt.permissions.len())?;

        for (permission, result) in prompt.permissions.iter().zip(&grant_results) {
            if *result == GrantResult::Granted {
                self.platform.grant(permission);
            }
        }

        Some(PermissionsResult::new(
            prompt.request_code,
            prompt.permissions.clone(),
            grant_results,
        ))
    }

    /// Answer prompts until the platform stops publishing them.
    pub async fn run(self, mut prompts: mpsc::UnboundedReceiver<PromptRecord>, broker: BrokerHandle) {
        while let Some(prompt) = prompts.recv().await {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if broker.is_closed() {
                debug!("Broker stopped, dropping prompt {}", prompt.request_code);
                break;
            }

            match self.answer(&prompt) {
                Some(result) => {
                    info!(
                        "User answered prompt {} with {:?}",
                        prompt.request_code, self.response
                    );
                    if let Err(e) = broker.on_request_permissions_result(result).await {
                        warn!("Could not deliver permission result: {}", e);
                        break;
                    }
                }
                None => {
                    debug!("User left prompt {} open", prompt.request_code);
                }
            }
        }
        debug!("Prompt responder stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERM: &str = "android.permission.BLUETOOTH_CONNECT";

    #[test]
    fn test_grant_and_revoke() {
        let platform = SimulatedPlatform::new(33);
        assert_eq!(platform.check_self_permission(PERM), GrantResult::Denied);

        platform.grant(PERM);
        assert_eq!(platform.check_self_permission(PERM), GrantResult::Granted);

        platform.revoke(PERM);
        assert_eq!(platform.check_self_permission(PERM), GrantResult::Denied);
    }

    #[test]
    fn test_prompts_are_recorded_and_published() {
        let platform = SimulatedPlatform::new(33);
        let mut rx = platform.subscribe();

        platform.request_permissions(&[PERM], RequestCode(1001));

        assert_eq!(platform.prompt_count(), 1);
        let published = rx.try_recv().unwrap();
        assert_eq!(published.request_code, RequestCode(1001));
        assert_eq!(published.permissions, vec![PERM.to_string()]);
        assert_eq!(platform.prompts()[0], published);
    }

    #[test]
    fn test_answer_allow_grants_on_platform() {
        let platform = SimulatedPlatform::new(33);
        platform.request_permissions(&[PERM], RequestCode(1001));
        let prompt = platform.prompts().remove(0);

        let responder = PromptResponder::new(platform.clone(), UserResponse::Allow, Duration::ZERO);
        let result = responder.answer(&prompt).unwrap();

        assert!(result.first_granted());
        assert_eq!(platform.check_self_permission(PERM), GrantResult::Granted);
    }

    #[test]
    fn test_answer_variants() {
        let platform = SimulatedPlatform::new(33);
        platform.request_permissions(&[PERM], RequestCode(1001));
        let prompt = platform.prompts().remove(0);

        let deny = PromptResponder::new(platform.clone(), UserResponse::Deny, Duration::ZERO);
        assert_eq!(deny.answer(&prompt).unwrap().grant_results, vec![GrantResult::Denied]);

        let dismiss = PromptResponder::new(platform.clone(), UserResponse::Dismiss, Duration::ZERO);
        assert!(dismiss.answer(&prompt).unwrap().grant_results.is_empty());

        let ignore = PromptResponder::new(platform.clone(), UserResponse::Ignore, Duration::ZERO);
        assert!(ignore.answer(&prompt).is_none());

        assert_eq!(platform.check_self_permission(PERM), GrantResult::Denied);
    }

    #[tokio::test]
    async fn test_responder_stops_when_broker_closed() {
        use crate::permission::{self, BrokeredPermission, PermissionBroker};
        use crate::state::BridgeStatus;

        let platform = SimulatedPlatform::new(33);
        let prompts = platform.subscribe();
        let broker = PermissionBroker::new(
            platform.clone(),
            BrokeredPermission::bluetooth_connect(),
            BridgeStatus::new(),
        );
        let (handle, task) = permission::spawn(broker, 8);
        task.abort();
        let _ = task.await;

        platform.request_permissions(&[PERM], RequestCode(1001));
        let responder = PromptResponder::new(platform.clone(), UserResponse::Allow, Duration::ZERO);
        responder.run(prompts, handle).await;

        // Nothing was answered, so nothing was granted.
        assert_eq!(platform.check_self_permission(PERM), GrantResult::Denied);
    }
}
