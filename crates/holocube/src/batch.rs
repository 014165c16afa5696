//! Splitting draw commands into device-sized batch requests
//!
//! The ESP8266 parses each batch into a fixed JSON document, and large
//! requests fail outright. Run-length icons easily produce hundreds of
//! rectangles, so command lists are cut into chunks bounded by both a command
//! count and a payload size, and sent one request at a time with a short
//! pause in between.

use tracing::debug;

use crate::client::{ApiResponse, HoloCube};
use crate::command::DrawCommand;
use crate::config::BatchPolicy;
use crate::error::{Error, Result};

/// Bytes of `{"commands":[]}` around the array, less the one trailing
/// separator that [`encoded_len`] counts.
const BODY_OVERHEAD: usize = r#"{"commands":[]}"#.len() - 1;

/// Bytes of JSON `command` contributes to a batch array (plus its separator).
fn encoded_len(command: &DrawCommand) -> Result<usize> {
    serde_json::to_vec(command)
        .map(|v| v.len().saturating_add(1))
        .map_err(Error::Encode)
}

/// Split `commands` into consecutive chunks that each respect `policy`.
///
/// Order is preserved and every command appears in exactly one chunk. The
/// serialised request body of a chunk stays within `max_bytes`, except for
/// a command that alone exceeds it, which is sent on its own.
pub fn chunk_commands<'a>(
    commands: &'a [DrawCommand],
    policy: &BatchPolicy,
) -> Result<Vec<&'a [DrawCommand]>> {
    let max_commands = policy.max_commands.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut bytes = BODY_OVERHEAD;

    for (i, command) in commands.iter().enumerate() {
        let len = encoded_len(command)?;
        let count = i - start;
        let full = count >= max_commands || (count > 0 && bytes.saturating_add(len) > policy.max_bytes);
        if full {
            chunks.push(&commands[start..i]);
            start = i;
            bytes = BODY_OVERHEAD;
        }
        bytes = bytes.saturating_add(len);
    }
    if start < commands.len() {
        chunks.push(&commands[start..]);
    }
    Ok(chunks)
}

impl HoloCube {
    /// Send any number of commands as a sequence of batch requests.
    ///
    /// Returns an `ok` response carrying the total number of processed
    /// commands. An empty list sends nothing. The first failing request
    /// aborts the rest.
    pub async fn send_batched(&self, commands: &[DrawCommand]) -> Result<ApiResponse> {
        let policy = self.batch_policy();
        let chunks = chunk_commands(commands, &policy)?;
        let mut processed = 0u32;

        for (i, chunk) in chunks.iter().enumerate() {
            debug!(chunk = i, commands = chunk.len(), "sending batch");
            let resp = self.batch(chunk).await?;
            let executed = resp
                .processed
                .unwrap_or_else(|| u32::try_from(chunk.len()).unwrap_or(u32::MAX));
            processed = processed.saturating_add(executed);
            tokio::time::sleep(policy.pause()).await;
        }
        Ok(ApiResponse::ok(processed))
    }
}
