use std::io::{self, Read};
use std::thread::JoinHandle;

use crossterm::tty::IsTty;
use dutop_core::CancellationToken;
use tracing::debug;

/// Cancel `token` as soon as one byte arrives on `input`
///
/// End of input or a read error leaves the token untouched, so piping from
/// `/dev/null` never stops a scan.
pub fn cancel_on_input<R>(mut input: R, token: CancellationToken) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut byte = [0u8; 1];
        match input.read(&mut byte) {
            Ok(n) if n > 0 => {
                debug!("input received, cancelling scan");
                token.cancel();
            }
            Ok(_) => debug!("stdin closed, cancellation by keypress disabled"),
            Err(e) => debug!(error = %e, "could not read stdin"),
        }
    })
}

/// Start the stop-on-<return> listener when stdin is a terminal
pub fn spawn_stdin_listener(token: CancellationToken) -> Option<JoinHandle<()>> {
    if !io::stdin().is_tty() {
        return None;
    }
    eprintln!("Press <return> to stop processing");
    Some(cancel_on_input(io::stdin(), token))
}
