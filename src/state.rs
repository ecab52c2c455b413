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

//! Observable bridge status.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::sync::Arc;

/// Broker phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerPhase {
    Idle,
    AwaitingPrompt,
}

impl BrokerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerPhase::Idle => "Idle",
            BrokerPhase::AwaitingPrompt => "Awaiting prompt",
        }
    }
}

/// A delivered permission answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub granted: bool,
    pub at: DateTime<Local>,
}

/// Shared status snapshot, written by the broker and read by anyone.
#[derive(Debug)]
pub struct BridgeStatus {
    /// Current broker phase.
    pub phase: RwLock<BrokerPhase>,

    /// Last answer delivered to a caller.
    pub last_resolution: RwLock<Option<Resolution>>,

    /// Prompts issued since start.
    pub prompts_issued: RwLock<u64>,

    /// Requests turned away because a prompt was outstanding.
    pub rejected: RwLock<u64>,
}

impl Default for BridgeStatus {
    fn default() -> Self {
        Self {
            phase: RwLock::new(BrokerPhase::Idle),
            last_resolution: RwLock::new(None),
            prompts_issued: RwLock::new(0),
            rejected: RwLock::new(0),
        }
    }
}

impl BridgeStatus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_awaiting_prompt(&self) {
        *self.phase.write() = BrokerPhase::AwaitingPrompt;
        *self.prompts_issued.write() += 1;
    }

    /// Record the answer to an outstanding prompt; the broker is idle again.
    pub fn record_resolution(&self, granted: bool) {
        *self.phase.write() = BrokerPhase::Idle;
        self.record_answer(granted);
    }

    /// Record an answer given without a prompt. The phase is left alone since
    /// another caller's prompt may still be open.
    pub fn record_answer(&self, granted: bool) {
        *self.last_resolution.write() = Some(Resolution {
            granted,
            at: Local::now(),
        });
    }

    pub fn record_rejected(&self) {
        *self.rejected.write() += 1;
    }

    pub fn get_phase(&self) -> BrokerPhase {
        *self.phase.read()
    }

    pub fn get_last_resolution(&self) -> Option<Resolution> {
        *self.last_resolution.read()
    }

    pub fn get_prompts_issued(&self) -> u64 {
        *self.prompts_issued.read()
    }

    pub fn get_rejected(&self) -> u64 {
        *self.rejected.read()
    }
}
