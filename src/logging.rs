//! Process-wide logging.
//!
//! A single, serialized, leveled sink (info/warn/error) with a timestamp on
//! every record, written to stdout by default. The `log` facade plus
//! `env_logger` gives us exactly that without hand-rolling a sink, the way
//! the rest of the example pack reaches for this pair.

/// Installs the process-wide sink. Must be called exactly once, before any
/// connection is accepted. This is the crate's one explicit initialization
/// point, not an implicit first-call-wins singleton.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
