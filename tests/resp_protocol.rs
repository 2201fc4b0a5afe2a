//! End-to-end RESP scenarios over a real TCP socket: the six concrete
//! scenarios and the pipelining property from `spec.md` §8, driven against
//! a server bound to an ephemeral port on a background thread.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use kvrs::Datastore;

/// Binds an ephemeral port, runs the listener on a background thread, and
/// returns the address clients should connect to. The thread is daemon-like
/// (never joined) — it lives for the process, same as the teacher's
/// fire-and-forget client threads.
fn start_server() -> String {
    let tcp = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = tcp.local_addr().unwrap().to_string();
    let ds = Datastore::new();

    thread::spawn(move || {
        for incoming in tcp.incoming() {
            if let Ok(stream) = incoming {
                let ds = ds.clone();
                thread::spawn(move || kvrs::worker::serve(stream, ds));
            }
        }
    });

    // give the accept loop a moment to be ready for the first connect
    thread::sleep(Duration::from_millis(50));
    addr
}

fn connect(addr: &str) -> TcpStream {
    TcpStream::connect(addr).expect("connect to test server")
}

fn send(stream: &mut TcpStream, raw: &[u8]) {
    stream.write_all(raw).unwrap();
}

/// Reads exactly `n` bytes of reply off the stream. Scenarios below know
/// the exact reply length up front, which keeps this a plain blocking read
/// instead of a framed response parser.
fn recv_exact(stream: &mut TcpStream, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    stream.read_exact(&mut buf).unwrap();
    buf
}

fn encode_array(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("*{}\r\n", parts.len()).as_bytes());
    for p in parts {
        out.extend_from_slice(format!("${}\r\n", p.len()).as_bytes());
        out.extend_from_slice(p);
        out.extend_from_slice(b"\r\n");
    }
    out
}

#[test]
fn scenario_set_then_get() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, &encode_array(&[b"SET", b"foo", b"bar"]));
    assert_eq!(recv_exact(&mut c, 5), b"+OK\r\n");

    send(&mut c, &encode_array(&[b"GET", b"foo"]));
    assert_eq!(recv_exact(&mut c, 9), b"$3\r\nbar\r\n");
}

#[test]
fn scenario_get_missing_key() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, &encode_array(&[b"GET", b"missing"]));
    assert_eq!(recv_exact(&mut c, 5), b"$-1\r\n");
}

#[test]
fn scenario_list_push_len_index() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, &encode_array(&[b"LPUSH", b"mylist", b"a", b"b", b"c"]));
    assert_eq!(recv_exact(&mut c, 4), b":3\r\n");

    send(&mut c, &encode_array(&[b"LLEN", b"mylist"]));
    assert_eq!(recv_exact(&mut c, 4), b":3\r\n");

    send(&mut c, &encode_array(&[b"LINDEX", b"mylist", b"0"]));
    assert_eq!(recv_exact(&mut c, 7), b"$1\r\nc\r\n");

    send(&mut c, &encode_array(&[b"LINDEX", b"mylist", b"-1"]));
    assert_eq!(recv_exact(&mut c, 7), b"$1\r\na\r\n");

    send(&mut c, &encode_array(&[b"LINDEX", b"mylist", b"5"]));
    assert_eq!(recv_exact(&mut c, 25), b"-ERR index out of range\r\n");
}

#[test]
fn scenario_type_mismatch_does_not_mutate() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, &encode_array(&[b"SET", b"k", b"v"]));
    assert_eq!(recv_exact(&mut c, 5), b"+OK\r\n");

    send(&mut c, &encode_array(&[b"LPUSH", b"k", b"x"]));
    let expected = b"-ERR Operation against a key holding the wrong kind of value\r\n";
    assert_eq!(recv_exact(&mut c, expected.len()), expected);

    send(&mut c, &encode_array(&[b"GET", b"k"]));
    assert_eq!(recv_exact(&mut c, 7), b"$1\r\nv\r\n");
}

#[test]
fn scenario_hash_set_and_get() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, &encode_array(&[b"HSET", b"h", b"f1", b"v1"]));
    assert_eq!(recv_exact(&mut c, 4), b":1\r\n");

    send(&mut c, &encode_array(&[b"HSET", b"h", b"f1", b"v2"]));
    assert_eq!(recv_exact(&mut c, 4), b":0\r\n");

    send(&mut c, &encode_array(&[b"HGET", b"h", b"f1"]));
    assert_eq!(recv_exact(&mut c, 8), b"$2\r\nv2\r\n");

    send(&mut c, &encode_array(&[b"HGET", b"h", b"missing"]));
    assert_eq!(recv_exact(&mut c, 5), b"$-1\r\n");
}

#[test]
fn scenario_lpush_lpop_empties_to_absent() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, &encode_array(&[b"LPUSH", b"l", b"x"]));
    assert_eq!(recv_exact(&mut c, 4), b":1\r\n");

    send(&mut c, &encode_array(&[b"LPOP", b"l"]));
    assert_eq!(recv_exact(&mut c, 7), b"$1\r\nx\r\n");

    send(&mut c, &encode_array(&[b"LLEN", b"l"]));
    assert_eq!(recv_exact(&mut c, 4), b":0\r\n");

    send(&mut c, &encode_array(&[b"LPOP", b"l"]));
    assert_eq!(recv_exact(&mut c, 5), b"$-1\r\n");
}

/// P8: N pipelined frames on one connection get N replies in the same
/// order, with no interleaving — sent back-to-back in a single write.
#[test]
fn pipelining_preserves_reply_order() {
    let addr = start_server();
    let mut c = connect(&addr);

    let mut pipeline = Vec::new();
    pipeline.extend(encode_array(&[b"SET", b"a", b"1"]));
    pipeline.extend(encode_array(&[b"SET", b"b", b"2"]));
    pipeline.extend(encode_array(&[b"GET", b"a"]));
    pipeline.extend(encode_array(&[b"GET", b"b"]));
    send(&mut c, &pipeline);

    assert_eq!(recv_exact(&mut c, 5), b"+OK\r\n");
    assert_eq!(recv_exact(&mut c, 5), b"+OK\r\n");
    assert_eq!(recv_exact(&mut c, 7), b"$1\r\n1\r\n");
    assert_eq!(recv_exact(&mut c, 7), b"$1\r\n2\r\n");
}

/// Two concurrently-connected clients share one datastore; a write on one
/// connection is visible to a read on the other (single shared mutex,
/// `spec.md` §5).
#[test]
fn concurrent_clients_share_one_datastore() {
    let addr = start_server();
    let mut writer = connect(&addr);
    let mut reader = connect(&addr);

    send(&mut writer, &encode_array(&[b"SET", b"shared", b"value"]));
    assert_eq!(recv_exact(&mut writer, 5), b"+OK\r\n");

    send(&mut reader, &encode_array(&[b"GET", b"shared"]));
    assert_eq!(recv_exact(&mut reader, 10), b"$5\r\nvalue\r\n");
}

/// A malformed frame drops the connection rather than leaving it hanging.
#[test]
fn malformed_frame_closes_connection() {
    let addr = start_server();
    let mut c = connect(&addr);

    send(&mut c, b"*notanumber\r\n");
    // the server closes its side; our read returns Ok(0) (EOF) rather than
    // any reply bytes.
    let mut buf = [0u8; 1];
    let n = c.read(&mut buf).unwrap();
    assert_eq!(n, 0);
}
