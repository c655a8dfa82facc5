//! # Table
//!
//! A hand-rolled open-addressing hash table, keyed by interned string
//! pointer, with linear probing and tombstone-aware deletion.
//!
//! This is deliberately *not* a wrapper over [`std::collections::HashMap`]:
//! the string interner needs [`Table::find_string`], which probes by hash
//! and then verifies length+content equality for a string that doesn't
//! exist as a heap object yet (see [`crate::object`]). `HashMap` has no
//! such "does an equivalent key already exist" query that works without
//! first owning or borrowing a key of the map's own key type, so it can't
//! express the interner's miss-then-allocate protocol. Every other
//! operation here (`get`/`set`/`delete`) mirrors the reference
//! implementation's `table.c` one-to-one, including its tombstone scheme.

use crate::object::ObjString;
use crate::value::Value;
use std::ptr::NonNull;

const TABLE_MAX_LOAD: f64 = 0.75;

/// A bucket in the table. `key = None, value = Nil` is an empty bucket;
/// `key = None, value = Bool(true)` is a tombstone (a logically-deleted
/// bucket kept around so later probes don't stop short); `key = Some(_)`
/// is occupied.
#[derive(Clone)]
struct Entry {
  key: Option<NonNull<ObjString>>,
  value: Value,
}

impl Entry {
  fn empty() -> Self {
    Entry {
      key: None,
      value: Value::Nil,
    }
  }

  fn is_tombstone(&self) -> bool {
    self.key.is_none() && matches!(self.value, Value::Bool(true))
  }

  fn is_empty_slot(&self) -> bool {
    self.key.is_none() && !self.is_tombstone()
  }
}

/// An open-addressed hash table mapping interned strings to [`Value`]s.
#[derive(Default)]
pub struct Table {
  count: usize,
  entries: Vec<Entry>,
}

impl Table {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.count
  }

  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  fn capacity(&self) -> usize {
    self.entries.len()
  }

  /// Locate the bucket `key` belongs in: on occupancy-by-equal-key this is
  /// the bucket that stores the value; on a miss, it's where `tableSet`
  /// should insert. Returns the index of the first tombstone seen along
  /// the probe sequence, or the terminating empty bucket if none was seen
  /// — exactly the reference implementation's `findEntry`.
  fn find_entry(entries: &[Entry], key: NonNull<ObjString>) -> usize {
    let capacity = entries.len();
    let hash = unsafe { key.as_ref() }.hash;
    let mut index = hash as usize % capacity;
    let mut tombstone: Option<usize> = None;
    loop {
      let entry = &entries[index];
      match entry.key {
        Some(k) if k == key => return index,
        None => {
          if entry.is_tombstone() {
            if tombstone.is_none() {
              tombstone = Some(index);
            }
          } else {
            return tombstone.unwrap_or(index);
          }
        }
        Some(_) => {}
      }
      index = (index + 1) % capacity;
    }
  }

  fn adjust_capacity(&mut self, capacity: usize) {
    let mut fresh = vec![Entry::empty(); capacity];
    let mut new_count = 0;
    for entry in &self.entries {
      if let Some(key) = entry.key {
        let index = Self::find_entry(&fresh, key);
        fresh[index] = Entry {
          key: Some(key),
          value: entry.value,
        };
        new_count += 1;
      }
    }
    self.entries = fresh;
    self.count = new_count;
  }

  /// Insert or overwrite `key => value`. Returns `true` if `key` was not
  /// already present (a *new* key — filling a tombstone does not count,
  /// since the slot was already charged against `count` when it was first
  /// occupied).
  pub fn set(&mut self, key: NonNull<ObjString>, value: Value) -> bool {
    if self.count + 1 > (self.capacity() as f64 * TABLE_MAX_LOAD) as usize {
      let new_capacity = if self.capacity() < 8 {
        8
      } else {
        self.capacity() * 2
      };
      self.adjust_capacity(new_capacity);
    }

    let index = Self::find_entry(&self.entries, key);
    let entry = &mut self.entries[index];
    let is_new_key = entry.is_empty_slot();
    if is_new_key {
      self.count += 1;
    }
    entry.key = Some(key);
    entry.value = value;
    is_new_key
  }

  pub fn get(&self, key: NonNull<ObjString>) -> Option<Value> {
    if self.entries.is_empty() {
      return None;
    }
    let index = Self::find_entry(&self.entries, key);
    let entry = &self.entries[index];
    entry.key.map(|_| entry.value)
  }

  /// Delete `key`, writing a tombstone in its place. `count` is left
  /// unchanged so that probe sequences through this bucket still find
  /// entries inserted after it.
  pub fn delete(&mut self, key: NonNull<ObjString>) -> bool {
    if self.entries.is_empty() {
      return false;
    }
    let index = Self::find_entry(&self.entries, key);
    let entry = &mut self.entries[index];
    if entry.key.is_none() {
      return false;
    }
    entry.key = None;
    entry.value = Value::Bool(true);
    true
  }

  /// Copy every occupied entry of `src` into `self`.
  pub fn add_all(&mut self, src: &Table) {
    for entry in &src.entries {
      if let Some(key) = entry.key {
        self.set(key, entry.value);
      }
    }
  }

  /// Probe by hash, verifying length+content equality at each occupied
  /// bucket, to find the canonical interned string matching `bytes` —
  /// used only by the interner, before a string object for `bytes` has
  /// been allocated at all.
  pub fn find_string(&self, bytes: &str, hash: u32) -> Option<NonNull<ObjString>> {
    if self.entries.is_empty() {
      return None;
    }
    let capacity = self.entries.len();
    let mut index = hash as usize % capacity;
    loop {
      let entry = &self.entries[index];
      match entry.key {
        None if !entry.is_tombstone() => return None,
        Some(key) => {
          let candidate = unsafe { key.as_ref() };
          if candidate.hash == hash && candidate.as_str() == bytes {
            return Some(key);
          }
        }
        None => {}
      }
      index = (index + 1) % capacity;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::object::{fnv1a_hash, ObjString};

  fn make_string(s: &str) -> NonNull<ObjString> {
    let boxed = Box::new(ObjString::new(s.to_owned()));
    NonNull::new(Box::into_raw(boxed)).unwrap()
  }

  unsafe fn free_string(key: NonNull<ObjString>) {
    drop(Box::from_raw(key.as_ptr()));
  }

  #[test]
  fn get_on_an_empty_table_misses() {
    let table = Table::new();
    let key = make_string("x");
    assert_eq!(table.get(key), None);
    unsafe { free_string(key) };
  }

  #[test]
  fn set_then_get_round_trips_and_counts_a_new_key() {
    let mut table = Table::new();
    let key = make_string("hello");
    assert!(table.set(key, Value::number_val(1.0)));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(key), Some(Value::number_val(1.0)));
    unsafe { free_string(key) };
  }

  #[test]
  fn overwriting_an_existing_key_does_not_change_count() {
    let mut table = Table::new();
    let key = make_string("x");
    assert!(table.set(key, Value::number_val(1.0)));
    assert_eq!(table.len(), 1);
    assert!(!table.set(key, Value::number_val(2.0)));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(key), Some(Value::number_val(2.0)));
    unsafe { free_string(key) };
  }

  #[test]
  fn delete_writes_a_tombstone_and_get_misses_afterward() {
    let mut table = Table::new();
    let key = make_string("gone");
    table.set(key, Value::number_val(1.0));
    assert!(table.delete(key));
    assert_eq!(table.get(key), None);
    // deleting an already-deleted key finds only the tombstone, not a key.
    assert!(!table.delete(key));
    unsafe { free_string(key) };
  }

  #[test]
  fn deleting_one_key_preserves_the_probe_chain_for_the_rest() {
    let mut table = Table::new();
    let keys: Vec<_> = (0..20).map(|i| make_string(&format!("key-{i}"))).collect();
    for (i, &key) in keys.iter().enumerate() {
      table.set(key, Value::number_val(i as f64));
    }

    assert!(table.delete(keys[5]));

    for (i, &key) in keys.iter().enumerate() {
      if i == 5 {
        assert_eq!(table.get(key), None);
      } else {
        assert_eq!(table.get(key), Some(Value::number_val(i as f64)));
      }
    }

    for key in keys {
      unsafe { free_string(key) };
    }
  }

  #[test]
  fn capacity_grows_in_doubling_steps_at_the_load_factor() {
    let mut table = Table::new();
    assert_eq!(table.capacity(), 0);

    let keys: Vec<_> = (0..6).map(|i| make_string(&format!("k{i}"))).collect();
    for (i, &key) in keys.iter().enumerate() {
      table.set(key, Value::number_val(i as f64));
    }
    // 6 entries at capacity 8 is exactly the 0.75 load factor; no resize yet.
    assert_eq!(table.capacity(), 8);

    let seventh = make_string("k6");
    table.set(seventh, Value::number_val(6.0));
    assert_eq!(table.capacity(), 16);

    for key in keys.into_iter().chain(std::iter::once(seventh)) {
      unsafe { free_string(key) };
    }
  }

  #[test]
  fn add_all_copies_every_occupied_entry_into_the_destination() {
    let mut src = Table::new();
    let mut dst = Table::new();
    let a = make_string("a");
    let b = make_string("b");
    src.set(a, Value::number_val(1.0));
    src.set(b, Value::number_val(2.0));

    dst.add_all(&src);

    assert_eq!(dst.get(a), Some(Value::number_val(1.0)));
    assert_eq!(dst.get(b), Some(Value::number_val(2.0)));

    unsafe {
      free_string(a);
      free_string(b);
    }
  }

  #[test]
  fn find_string_matches_by_hash_and_content_before_any_object_exists() {
    let mut table = Table::new();
    let key = make_string("needle");
    table.set(key, Value::Nil);

    let hash = fnv1a_hash(b"needle");
    assert_eq!(table.find_string("needle", hash), Some(key));
    assert_eq!(table.find_string("different", fnv1a_hash(b"different")), None);

    unsafe { free_string(key) };
  }
}
