//! RESP reply encoding.
//!
//! The teacher pre-renders common replies as static `RedisObject` byte
//! strings (`obj.rs`'s `OK`, `NULL_BULK`, `C_ZERO`, `WRONG_TYPE_ERR`, ...).
//! Here the wire-facing command set is small enough that a `Reply` enum
//! rendered on demand is simpler and just as cheap, while staying exactly
//! as explicit about each reply shape.

use std::io::{self, Write};

/// One of the four RESP reply shapes the protocol requires, plus the
/// simple-ok shape used by `SET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Error(String),
    Integer(i64),
    Bulk(Option<Vec<u8>>),
}

impl Reply {
    pub fn err<S: Into<String>>(msg: S) -> Reply {
        Reply::Error(msg.into())
    }

    pub fn nil() -> Reply {
        Reply::Bulk(None)
    }

    pub fn bulk(v: Vec<u8>) -> Reply {
        Reply::Bulk(Some(v))
    }

    /// Writes the reply verbatim as RESP wire bytes.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Reply::Ok => w.write_all(b"+OK\r\n"),
            Reply::Error(msg) => {
                w.write_all(b"-")?;
                w.write_all(msg.as_bytes())?;
                w.write_all(b"\r\n")
            }
            Reply::Integer(n) => write!(w, ":{}\r\n", n),
            Reply::Bulk(None) => w.write_all(b"$-1\r\n"),
            Reply::Bulk(Some(bytes)) => {
                write!(w, "${}\r\n", bytes.len())?;
                w.write_all(bytes)?;
                w.write_all(b"\r\n")
            }
        }
    }
}

pub fn unknown_command_error(name: &str) -> Reply {
    Reply::err(format!("ERR unknown command '{}'", name))
}

pub fn wrong_arity_error(name: &str) -> Reply {
    Reply::err(format!("ERR wrong number of arguments for '{}' command", name))
}

pub fn wrong_type_error() -> Reply {
    Reply::err("ERR Operation against a key holding the wrong kind of value")
}

pub fn not_an_integer_error() -> Reply {
    Reply::err("ERR value is not an integer or out of range")
}

pub fn out_of_range_error() -> Reply {
    Reply::err("ERR index out of range")
}
