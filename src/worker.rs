//! Connection Worker.
//!
//! One OS thread per accepted connection, looping Frame Reader ->
//! Executor -> writer until the client disconnects or a parse error ends
//! the connection. Grounded on the teacher's `handler.rs` accept/read
//! handlers, re-expressed as a blocking per-thread loop instead of a
//! single-reactor callback.

use std::io::{BufReader, Write};
use std::net::TcpStream;

use crate::command::execute;
use crate::datastore::Datastore;
use crate::error::Error;
use crate::frame::{Frame, FrameReader};

/// Drives one client connection to completion. Never panics the caller's
/// thread on a client-caused fault: every error path is logged and the
/// function simply returns, so the Listener's accept loop and every other
/// worker are unaffected.
///
/// The datastore is passed explicitly rather than reached through a global
/// or stashed on a per-connection handle: the connection and its
/// dependencies are explicit arguments, not implicit state.
pub fn serve(stream: TcpStream, ds: Datastore) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    log::info!("connection opened: {peer}");

    if let Err(e) = run(&stream, &ds) {
        match &e {
            Error::Io(io_err) if is_reset_by_peer(io_err) => {
                log::error!("connection reset by peer {peer}: {io_err}");
            }
            Error::Io(io_err) => {
                log::error!("I/O fault on connection {peer}: {io_err}");
            }
            Error::Protocol(msg) => {
                log::error!("protocol parse error on connection {peer}: {msg}");
            }
        }
    }

    log::info!("connection closed: {peer}");
}

fn run(stream: &TcpStream, ds: &Datastore) -> Result<(), Error> {
    let mut reader = FrameReader::new(BufReader::new(stream.try_clone()?));
    let mut writer = stream.try_clone()?;

    loop {
        match reader.read_statement() {
            Ok(Frame::Eof) => return Ok(()),
            Ok(Frame::Statement(statement)) => {
                let reply = execute(ds, &statement);
                reply.write_to(&mut writer)?;
                writer.flush()?;
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_reset_by_peer(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted
    )
}
