//! Command Registry & Executor.
//!
//! Dispatch is an explicit table keyed by lowercase name, not reflective
//! method lookup.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::datastore::Datastore;
use crate::reply::{unknown_command_error, wrong_arity_error, Reply};

/// Arity as the command table states it: `Exact(n)` for everything except
/// `LPUSH`, which is variadic with a minimum.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    fn matches(self, argc: usize) -> bool {
        match self {
            Arity::Exact(n) => argc == n,
            Arity::AtLeast(n) => argc >= n,
        }
    }
}

type Handler = fn(&Datastore, &[Vec<u8>]) -> Reply;

struct Command {
    name: &'static str,
    arity: Arity,
    handler: Handler,
}

/// Command table: lowercase name -> handler. Built once, looked up by
/// normalized name on every dispatch.
static CMD_TABLE: Lazy<HashMap<&'static str, Command>> = Lazy::new(|| {
    let commands = [
        Command { name: "set", arity: Arity::Exact(3), handler: set_command },
        Command { name: "get", arity: Arity::Exact(2), handler: get_command },
        Command { name: "lpush", arity: Arity::AtLeast(3), handler: lpush_command },
        Command { name: "lpop", arity: Arity::Exact(2), handler: lpop_command },
        Command { name: "llen", arity: Arity::Exact(2), handler: llen_command },
        Command { name: "lindex", arity: Arity::Exact(3), handler: lindex_command },
        Command { name: "hset", arity: Arity::Exact(4), handler: hset_command },
        Command { name: "hget", arity: Arity::Exact(3), handler: hget_command },
    ];
    commands.into_iter().map(|c| (c.name, c)).collect()
});

/// The core of statement execution: normalize name, look up a handler,
/// validate arity, call through into the handler (which validates operand
/// types against the Datastore before mutating).
pub fn execute(ds: &Datastore, statement: &[Vec<u8>]) -> Reply {
    debug_assert!(!statement.is_empty(), "Frame Reader never yields an empty statement");

    // The Frame Reader's *0 sentinel is the single statement ["null"],
    // which must report as the *empty* command name, not as an unknown
    // command literally named "null".
    if statement.len() == 1 && statement[0] == b"null" {
        return unknown_command_error("");
    }

    let raw_name = String::from_utf8_lossy(&statement[0]).to_string();
    let name = raw_name.to_lowercase();

    match CMD_TABLE.get(name.as_str()) {
        None => unknown_command_error(&raw_name),
        Some(cmd) => {
            if !cmd.arity.matches(statement.len()) {
                return wrong_arity_error(cmd.name);
            }
            (cmd.handler)(ds, &statement[1..])
        }
    }
}

fn set_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    ds.set(args[0].clone(), args[1].clone());
    Reply::Ok
}

fn get_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    match ds.get(&args[0]) {
        Ok(Some(v)) => Reply::bulk(v),
        Ok(None) => Reply::nil(),
        Err(e) => e.into_reply(),
    }
}

fn lpush_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    let key = &args[0];
    let values = &args[1..];
    match ds.list_head_push(key, values) {
        Ok(len) => Reply::Integer(len as i64),
        Err(e) => e.into_reply(),
    }
}

fn lpop_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    match ds.list_head_pop(&args[0]) {
        Ok(Some(v)) => Reply::bulk(v),
        Ok(None) => Reply::nil(),
        Err(e) => e.into_reply(),
    }
}

fn llen_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    match ds.list_len(&args[0]) {
        Ok(len) => Reply::Integer(len as i64),
        Err(e) => e.into_reply(),
    }
}

fn lindex_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    let index = match parse_i64(&args[1]) {
        Some(i) => i,
        None => return crate::reply::not_an_integer_error(),
    };
    match ds.list_index(&args[0], index) {
        Ok(Some(v)) => Reply::bulk(v),
        Ok(None) => Reply::nil(),
        Err(e) => e.into_reply(),
    }
}

fn hset_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    match ds.hash_set(&args[0], args[1].clone(), args[2].clone()) {
        Ok(true) => Reply::Integer(1),
        Ok(false) => Reply::Integer(0),
        Err(e) => e.into_reply(),
    }
}

fn hget_command(ds: &Datastore, args: &[Vec<u8>]) -> Reply {
    match ds.hash_get(&args[0], &args[1]) {
        Ok(Some(v)) => Reply::bulk(v),
        Ok(None) => Reply::nil(),
        Err(e) => e.into_reply(),
    }
}

fn parse_i64(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.parse::<i64>().ok()
}
