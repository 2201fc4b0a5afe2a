//! The Datastore.
//!
//! A single process-wide mutual-exclusion region guards all state, giving
//! every command single-statement atomicity. Grounded on the teacher's
//! `RedisDB`/`Arc<RwLock<RedisServer>>` sharing pattern (`redis/db.rs`,
//! `server.rs`), narrowed to one plain `Mutex` since every operation below
//! mutates: a split read/write lock buys nothing here.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::reply::{not_an_integer_error, out_of_range_error, wrong_type_error, Reply};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    WrongType,
    OutOfRange,
    NotAnInteger,
}

impl DomainError {
    pub fn into_reply(self) -> Reply {
        match self {
            DomainError::WrongType => wrong_type_error(),
            DomainError::OutOfRange => out_of_range_error(),
            DomainError::NotAnInteger => not_an_integer_error(),
        }
    }
}

type DsResult<T> = Result<T, DomainError>;

#[derive(Clone, Default)]
pub struct Datastore {
    inner: Arc<Mutex<HashMap<Vec<u8>, Value>>>,
}

impl Datastore {
    pub fn new() -> Self {
        Datastore {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &[u8]) -> DsResult<Option<Vec<u8>>> {
        let map = self.inner.lock().unwrap();
        match map.get(key) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(_) => Err(DomainError::WrongType),
        }
    }

    pub fn set(&self, key: Vec<u8>, value: Vec<u8>) {
        let mut map = self.inner.lock().unwrap();
        map.insert(key, Value::Str(value));
    }

    /// Prepends each element of `values` to the list at `key`, in the order
    /// given: each element is inserted at the head in turn, so the last
    /// element of `values` ends up at index 0. Creates an empty list first
    /// if `key` is absent. Returns the number of elements pushed by *this*
    /// call, not the list's resulting length.
    pub fn list_head_push(&self, key: &[u8], values: &[Vec<u8>]) -> DsResult<usize> {
        let mut map = self.inner.lock().unwrap();
        let entry = map
            .entry(key.to_vec())
            .or_insert_with(|| Value::List(VecDeque::new()));
        match entry {
            Value::List(list) => {
                for v in values {
                    list.push_front(v.clone());
                }
                Ok(values.len())
            }
            _ => Err(DomainError::WrongType),
        }
    }

    /// Removes and returns the head element. If the list becomes empty the
    /// key is removed entirely: absent, not an empty list.
    pub fn list_head_pop(&self, key: &[u8]) -> DsResult<Option<Vec<u8>>> {
        let mut map = self.inner.lock().unwrap();
        match map.get_mut(key) {
            None => Ok(None),
            Some(Value::List(list)) => {
                let popped = list.pop_front();
                if list.is_empty() {
                    map.remove(key);
                }
                Ok(popped)
            }
            Some(_) => Err(DomainError::WrongType),
        }
    }

    pub fn list_len(&self, key: &[u8]) -> DsResult<usize> {
        let map = self.inner.lock().unwrap();
        match map.get(key) {
            None => Ok(0),
            Some(Value::List(list)) => Ok(list.len()),
            Some(_) => Err(DomainError::WrongType),
        }
    }

    /// Element at `i`, negative counts from the tail. For a list of length
    /// `L`: `0 <= i < L` selects `i`; `-L <= i < 0` selects `L + i`.
    /// Anything else is out-of-range.
    pub fn list_index(&self, key: &[u8], index: i64) -> DsResult<Option<Vec<u8>>> {
        let map = self.inner.lock().unwrap();
        match map.get(key) {
            None => Ok(None),
            Some(Value::List(list)) => {
                let len = list.len() as i64;
                let actual = if index < 0 { len + index } else { index };
                if actual < 0 || actual >= len {
                    return Err(DomainError::OutOfRange);
                }
                Ok(list.get(actual as usize).cloned())
            }
            Some(_) => Err(DomainError::WrongType),
        }
    }

    /// Returns `true` if `field` was newly inserted, `false` if it already
    /// existed and was overwritten. Creates an empty hash first if `key` is
    /// absent.
    pub fn hash_set(&self, key: &[u8], field: Vec<u8>, value: Vec<u8>) -> DsResult<bool> {
        let mut map = self.inner.lock().unwrap();
        let entry = map
            .entry(key.to_vec())
            .or_insert_with(|| Value::Hash(HashMap::new()));
        match entry {
            Value::Hash(hash) => Ok(hash.insert(field, value).is_none()),
            _ => Err(DomainError::WrongType),
        }
    }

    pub fn hash_get(&self, key: &[u8], field: &[u8]) -> DsResult<Option<Vec<u8>>> {
        let map = self.inner.lock().unwrap();
        match map.get(key) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(_) => Err(DomainError::WrongType),
        }
    }
}
