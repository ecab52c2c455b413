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

//! Method call and response definitions and serialization.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Default channel name the endpoint answers on.
pub const DEFAULT_CHANNEL: &str = "com.example.app_mr_plannter/bluetooth";

/// A named method call from the application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Caller-chosen id echoed in the response
    pub id: u64,

    /// Target channel; `None` means the endpoint's own channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Method name
    pub method: String,

    /// Method arguments (unused by the permission method)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub arguments: serde_json::Value,
}

impl MethodCall {
    pub fn new(id: u64, method: impl Into<String>) -> Self {
        Self {
            id,
            channel: None,
            method: method.into(),
            arguments: serde_json::Value::Null,
        }
    }

    pub fn on_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json.trim())?)
    }

    /// Serialize to a JSON line with newline delimiter.
    #[cfg(test)]
    pub fn to_json(&self) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string(self)?))
    }
}

/// The single answer to a method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success { result: bool },
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: bool) -> Self {
        Self::Success { result }
    }

    pub fn from_error(err: &BridgeError) -> Self {
        match err {
            BridgeError::NotImplemented(_) => Self::NotImplemented,
            other => Self::Error {
                code: other.code().to_string(),
                message: other.to_string(),
            },
        }
    }

    /// The boolean result, if this is a success.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Success { result } => Some(*result),
            _ => None,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }
}

/// A response tagged with the id of the call it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: u64,
    #[serde(flatten)]
    pub response: MethodResponse,
}

impl ResponseEnvelope {
    pub fn new(id: u64, response: MethodResponse) -> Self {
        Self { id, response }
    }

    /// Serialize to JSON string with newline delimiter.
    pub fn to_json(&self) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string(self)?))
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::RequestCode;

    #[test]
    fn test_call_parsing() {
        let call = MethodCall::from_json(r#"{"id":7,"method":"requestBluetoothConnectPermission"}"#).unwrap();
        assert_eq!(call.id, 7);
        assert_eq!(call.method, "requestBluetoothConnectPermission");
        assert_eq!(call.channel, None);
        assert!(call.arguments.is_null());

        let call = MethodCall::from_json(
            r#"{"id":8,"channel":"other","method":"x","arguments":{"a":1}}"#,
        )
        .unwrap();
        assert_eq!(call.channel.as_deref(), Some("other"));
        assert_eq!(call.arguments["a"], 1);
    }

    #[test]
    fn test_call_serialization_skips_empty_fields() {
        let json = MethodCall::new(1, "ping").to_json().unwrap();
        assert_eq!(json, "{\"id\":1,\"method\":\"ping\"}\n");
    }

    #[test]
    fn test_response_serialization() {
        let json = ResponseEnvelope::new(3, MethodResponse::success(true)).to_json().unwrap();
        assert!(json.contains("\"id\":3"));
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"result\":true"));
        assert!(json.ends_with('\n'));

        let json = ResponseEnvelope::new(4, MethodResponse::NotImplemented).to_json().unwrap();
        assert!(json.contains("\"status\":\"not_implemented\""));
        assert!(!json.contains("result"));

        let parsed = ResponseEnvelope::from_json(&json).unwrap();
        assert_eq!(parsed.id, 4);
        assert!(parsed.response.is_not_implemented());
    }

    #[test]
    fn test_response_from_error() {
        let busy = MethodResponse::from_error(&BridgeError::RequestInProgress(RequestCode(1001)));
        match busy {
            MethodResponse::Error { code, message } => {
                assert_eq!(code, "REQUEST_IN_PROGRESS");
                assert!(message.contains("1001"));
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let missing = MethodResponse::from_error(&BridgeError::NotImplemented("x".into()));
        assert!(missing.is_not_implemented());
        assert_eq!(missing.as_bool(), None);
    }
}
