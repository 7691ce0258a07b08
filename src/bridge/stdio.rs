/// Line-delimited JSON transport for the request bridge
///
/// Each input line is `{"seq": 1, "op": "...", ...args}`; each output line is
/// `{"seq": 1, "result": ...}`. Lines that do not parse get
/// `{"seq": <seq or null>, "error": "..."}` and the loop carries on.

use crate::bridge::actor::BridgeHandle;
use crate::bridge::request::{Reply, Request};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct Incoming {
    seq: u64,
    #[serde(flatten)]
    request: Request,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outgoing {
    Result { seq: u64, result: Reply },
    Error { seq: Option<u64>, error: String },
}

/// Serve requests from `reader` until end of input
pub async fn serve<R, W>(bridge: &BridgeHandle, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut served = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let outgoing = match serde_json::from_str::<Incoming>(&line) {
            Ok(Incoming { seq, request }) => {
                let result = bridge.call(request).await?;
                served += 1;
                Outgoing::Result { seq, result }
            }
            Err(e) => {
                warn!(error = %e, "rejected malformed request");
                Outgoing::Error {
                    seq: salvage_seq(&line),
                    error: e.to_string(),
                }
            }
        };

        let mut encoded = serde_json::to_string(&outgoing)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }

    info!(served, "input closed, stopping transport");
    Ok(())
}

// Best effort so the caller can match the error to its request
fn salvage_seq(line: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()?
        .get("seq")?
        .as_u64()
}
