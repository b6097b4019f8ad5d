//! Settings documents.
//!
//! A settings document is a flat map from short keys to typed values.
//! It is the unit of exchange for the config diff protocol: subsystems
//! fill one from their state, merge one into their state, and the
//! handlers redact secrets before a document is ever echoed outward.

use core::fmt;

use heapless::{FnvIndexMap, String, Vec};
use serde::{Deserialize, Serialize};

/// Maximum entries in one document (power of two, index-map requirement)
pub const MAX_SETTINGS: usize = 16;

/// Capacity of a settings key
pub const KEY_LEN: usize = 16;

/// Capacity of a string value
pub const STR_LEN: usize = 64;

/// Capacity of an array value
pub const ARRAY_LEN: usize = 8;

/// Placeholder reported instead of stored secrets. A write carrying
/// exactly this value is ignored, so echoed documents can be sent back
/// unmodified without wiping the secret.
pub const MASKED_SECRET: &str = "********";

pub type Key = String<KEY_LEN>;

/// A typed settings value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    Bool(bool),
    Uint(u32),
    Str(String<STR_LEN>),
    Array(Vec<u32, ARRAY_LEN>),
}

/// A flat key/value settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    map: FnvIndexMap<Key, Value, MAX_SETTINGS>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Insert or replace an entry. Returns `true` when the stored value
    /// for `key` changed. Silently drops the entry if the document or
    /// the key capacity is exceeded.
    pub fn insert(&mut self, key: &str, value: Value) -> bool {
        let Ok(key) = Key::try_from(key) else {
            return false;
        };
        match self.map.get(&key) {
            Some(old) if *old == value => false,
            _ => self.map.insert(key, value).is_ok(),
        }
    }

    pub fn insert_bool(&mut self, key: &str, v: bool) -> bool {
        self.insert(key, Value::Bool(v))
    }

    pub fn insert_uint(&mut self, key: &str, v: u32) -> bool {
        self.insert(key, Value::Uint(v))
    }

    pub fn insert_str(&mut self, key: &str, v: &str) -> bool {
        let Ok(s) = String::try_from(v) else {
            return false;
        };
        self.insert(key, Value::Str(s))
    }

    pub fn insert_array(&mut self, key: &str, v: &[u32]) -> bool {
        let Ok(a) = Vec::from_slice(v) else {
            return false;
        };
        self.insert(key, Value::Array(a))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let key = Key::try_from(key).ok()?;
        self.map.get(&key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let key = Key::try_from(key).ok()?;
        self.map.remove(&key)
    }

    /// Boolean view of an entry; numbers coerce (nonzero is true)
    pub fn bool_of(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Uint(u) => Some(*u != 0),
            _ => None,
        }
    }

    /// Unsigned view of an entry; decimal strings coerce
    pub fn uint_of(&self, key: &str) -> Option<u32> {
        match self.get(key)? {
            Value::Uint(u) => Some(*u),
            Value::Bool(b) => Some(*b as u32),
            Value::Str(s) => s.parse().ok(),
            Value::Array(_) => None,
        }
    }

    pub fn str_of(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn array_of(&self, key: &str) -> Option<&[u32]> {
        match self.get(key)? {
            Value::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    /// Replace a secret entry with [`MASKED_SECRET`] if present and
    /// non-empty. Empty secrets stay visible so a cleared password is
    /// distinguishable from a set one.
    pub fn redact(&mut self, key: &str) {
        let masked = match self.str_of(key) {
            Some(s) if !s.is_empty() => true,
            _ => false,
        };
        if masked {
            self.insert_str(key, MASKED_SECRET);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.map.iter()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match v {
                Value::Bool(b) => write!(f, "\"{}\":{}", k, b)?,
                Value::Uint(u) => write!(f, "\"{}\":{}", k, u)?,
                Value::Str(s) => write!(f, "\"{}\":\"{}\"", k, s)?,
                Value::Array(a) => {
                    write!(f, "\"{}\":[", k)?;
                    for (j, x) in a.iter().enumerate() {
                        if j > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", x)?;
                    }
                    write!(f, "]")?;
                }
            }
        }
        write!(f, "}}")
    }
}

/// Merge helper: overwrite `cur` with `new` when present and different.
/// Returns `true` on change.
pub fn diff_set<T: PartialEq + Copy>(cur: &mut T, new: Option<T>) -> bool {
    match new {
        Some(v) if v != *cur => {
            *cur = v;
            true
        }
        _ => false,
    }
}

/// Merge helper for secret strings: the masked placeholder is ignored,
/// everything else overwrites on difference. Returns `true` on change.
pub fn diff_set_secret<const N: usize>(cur: &mut String<N>, new: Option<&str>) -> bool {
    match new {
        Some(MASKED_SECRET) => false,
        Some(v) if v != cur.as_str() => match String::try_from(v) {
            Ok(s) => {
                *cur = s;
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}

/// Merge helper for plain strings. Returns `true` on change.
pub fn diff_set_str<const N: usize>(cur: &mut String<N>, new: Option<&str>) -> bool {
    match new {
        Some(v) if v != cur.as_str() => match String::try_from(v) {
            Ok(s) => {
                *cur = s;
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}
