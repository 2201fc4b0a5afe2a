use std::process::exit;

/// Process bootstrap: install the logger, bind the listening port, run the
/// accept loop forever. No command-line flags or config files; the
/// listening port is a compile-time constant, overridable only through
/// `KVRS_PORT` for this crate's own test harness.
fn main() {
    kvrs::logging::init();

    let port = std::env::var("KVRS_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(kvrs::DEFAULT_PORT);
    let addr = format!("0.0.0.0:{port}");

    if let Err(e) = kvrs::run(&addr) {
        log::error!("server exited: {e}");
        exit(1);
    }
}
