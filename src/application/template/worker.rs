//! The unit side of the render protocol.

use std::io::{self, BufRead, Write};

use super::{engine, protocol};

/// Answer one serialized request with one serialized reply. Never fails:
/// every problem becomes the `err` half of the reply.
pub(crate) fn handle_request(raw: &str) -> String {
    let result = match protocol::decode_request(raw) {
        Ok((template, view, helpers)) => engine::render(&template, &view, &helpers),
        Err(err) => Err(format!("invalid render request: {err}")),
    };
    protocol::encode_reply(result)
}

/// Serve a single request over stdin/stdout, then return.
///
/// Stdout carries only the reply line; diagnostics belong on stderr.
pub fn serve_stdio() -> io::Result<()> {
    let mut request = String::new();
    let read = io::stdin().lock().read_line(&mut request)?;
    if read == 0 || request.trim().is_empty() {
        return Ok(());
    }

    let reply = handle_request(&request);
    let mut stdout = io::stdout().lock();
    stdout.write_all(reply.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}
