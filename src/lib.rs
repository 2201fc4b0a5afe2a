pub mod command;
pub mod datastore;
pub mod error;
pub mod frame;
pub mod listener;
pub mod logging;
pub mod reply;
pub mod value;
pub mod worker;

pub use datastore::Datastore;
pub use listener::DEFAULT_PORT;

/// Runs the server's accept loop on `addr` against a fresh `Datastore`.
/// This is the single entry point `main.rs` and this crate's own
/// integration tests both go through.
pub fn run(addr: &str) -> std::io::Result<()> {
    listener::run(addr, Datastore::new())
}
