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

//! Line-delimited JSON transport for the endpoint.

use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::endpoint::BridgeEndpoint;
use super::protocol::{MethodCall, ResponseEnvelope};

/// Read calls from `reader` until EOF and dispatch each one.
///
/// Responses are sent to `responses` as they resolve, in any order. Lines
/// that are not valid UTF-8 or not a valid call are logged and skipped; only
/// a failed read ends the loop early.
pub async fn serve_lines<R>(
    mut reader: R,
    endpoint: Arc<BridgeEndpoint>,
    responses: mpsc::Sender<ResponseEnvelope>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            info!("Input closed");
            return Ok(());
        }

        let Some(call) = parse_line(&buf) else {
            continue;
        };

        let endpoint = endpoint.clone();
        let responses = responses.clone();
        tokio::spawn(async move {
            let response = endpoint.invoke(&call).await;
            if responses.send(ResponseEnvelope::new(call.id, response)).await.is_err() {
                warn!("Response writer gone, dropping response {}", call.id);
            }
        });
    }
}

fn parse_line(bytes: &[u8]) -> Option<MethodCall> {
    let line = match std::str::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            warn!("Discarding line that is not valid UTF-8: {}", e);
            return None;
        }
    };

    if line.trim().is_empty() {
        return None;
    }

    match MethodCall::from_json(line) {
        Ok(call) => Some(call),
        Err(e) => {
            warn!("Discarding malformed call: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{MethodResponse, DEFAULT_CHANNEL};
    use crate::permission::{self, BrokeredPermission, PermissionBroker};
    use crate::platform::SimulatedPlatform;
    use crate::state::BridgeStatus;

    const METHOD: &str = "requestBluetoothConnectPermission";

    fn endpoint(sdk_version: u32) -> Arc<BridgeEndpoint> {
        let platform = SimulatedPlatform::new(sdk_version);
        let broker = PermissionBroker::new(
            platform,
            BrokeredPermission::bluetooth_connect(),
            BridgeStatus::new(),
        );
        let (handle, _task) = permission::spawn(broker, 8);
        Arc::new(BridgeEndpoint::new(DEFAULT_CHANNEL, handle))
    }

    async fn collect(input: &[u8], sdk_version: u32) -> Vec<ResponseEnvelope> {
        let (tx, mut rx) = mpsc::channel(8);
        serve_lines(input, endpoint(sdk_version), tx).await.unwrap();

        let mut responses = Vec::new();
        while let Some(response) = rx.recv().await {
            responses.push(response);
        }
        responses.sort_by_key(|r| r.id);
        responses
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(b"\xff\xfe\n"), None);
        assert_eq!(parse_line(b"   \n"), None);
        assert_eq!(parse_line(b"garbage\n"), None);

        let call = parse_line(br#"{"id":5,"method":"requestBluetoothConnectPermission"}"#).unwrap();
        assert_eq!(call, MethodCall::new(5, METHOD));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_serving() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(MethodCall::new(1, METHOD).to_json().unwrap().as_bytes());

        let responses = collect(&input, 30).await;

        assert_eq!(responses, vec![ResponseEnvelope::new(1, MethodResponse::success(true))]);
    }

    #[tokio::test]
    async fn test_bad_lines_are_skipped() {
        let mut input = Vec::new();
        input.extend_from_slice(b"garbage\n\n");
        input.extend_from_slice(MethodCall::new(1, METHOD).to_json().unwrap().as_bytes());
        input.extend_from_slice(b"{\"id\":\n");
        input.extend_from_slice(MethodCall::new(2, "unknownMethod").to_json().unwrap().as_bytes());
        // Last line without a trailing newline still counts.
        input.extend_from_slice(br#"{"id":3,"method":"requestBluetoothConnectPermission"}"#);

        let responses = collect(&input, 30).await;

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].response, MethodResponse::success(true));
        assert!(responses[1].response.is_not_implemented());
        assert_eq!(responses[2].response, MethodResponse::success(true));
    }

    #[tokio::test]
    async fn test_empty_input_returns_immediately() {
        assert!(collect(b"", 30).await.is_empty());
    }
}
