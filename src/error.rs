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

//! Errors reported back over the bridge channel.
//!
//! A denied permission is not an error; it resolves to `false`. These are the
//! conditions where the caller gets no boolean at all.

use thiserror::Error;

use crate::platform::RequestCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The method name is not handled by this endpoint.
    #[error("method not implemented: {0}")]
    NotImplemented(String),

    /// A prompt for the same permission is still waiting for the user.
    #[error("a permission prompt with request code {0} is already in progress")]
    RequestInProgress(RequestCode),

    /// The broker task has stopped.
    #[error("permission broker is not running")]
    BrokerClosed,
}

impl BridgeError {
    /// Stable code sent over the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::RequestInProgress(_) => "REQUEST_IN_PROGRESS",
            Self::BrokerClosed => "BROKER_CLOSED",
        }
    }
}
