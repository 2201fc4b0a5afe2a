//! The Listener.
//!
//! Binds a TCP port, accepts indefinitely, and spawns one worker thread per
//! accepted connection; backpressure, if any, is left to the OS accept
//! queue. Grounded on the teacher's `net.rs::tcp_server`/`accept` pair,
//! re-expressed over `std::net::TcpListener` for a thread-per-connection
//! model.

use std::net::TcpListener;
use std::thread;

use crate::datastore::Datastore;
use crate::worker;

/// The fixed listening port. Overridable only through `KVRS_PORT`, which
/// exists purely so this crate's own tests can bind an ephemeral port.
pub const DEFAULT_PORT: u16 = 6379;

/// Binds `addr` and runs the accept loop forever, spawning one thread per
/// connection against a shared `Datastore`. Never returns unless binding
/// fails or the listener's socket errors out irrecoverably.
pub fn run(addr: &str, ds: Datastore) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr)?;
    log::info!("listening on {addr}");

    for incoming in listener.incoming() {
        match incoming {
            Ok(stream) => {
                let ds = ds.clone();
                thread::spawn(move || worker::serve(stream, ds));
            }
            Err(e) => {
                log::error!("accept failed: {e}");
            }
        }
    }
    Ok(())
}
