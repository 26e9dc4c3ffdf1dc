//! strmap: a single-threaded, open-addressing map from string keys to
//! owned values, with tombstone deletion and a cursor-style iterator.
//!
//! Internal Design:
//!
//! Summary
//! - `Table<V>` owns a flat array of slots. Each slot is Empty, Occupied
//!   (owned key plus value) or Deleted (a tombstone).
//! - Keys hash with Jenkins one-at-a-time, reduced modulo the current
//!   capacity. Collisions resolve by linear probing with wraparound.
//! - `Cursor<'a, V>` walks the slot array by index; `Iter<'a, V>` adapts it
//!   to `Iterator`.
//!
//! Probing and tombstones
//! - A probe starts at the key's home slot and stops at the first Empty
//!   slot. Tombstones never stop a probe and never match, so entries placed
//!   past a removed key stay reachable.
//! - New keys go into the Empty slot that ended the probe.
//! - Every table keeps at least one Empty slot; `locate` relies on that
//!   instead of counting steps.
//!
//! Resize policy
//! - Grow x5 when the next insert would push live load above 0.7.
//! - Rebuild at the same capacity when live entries plus tombstones would
//!   cross that watermark but live load alone would not.
//! - Shrink /5 when a removal finds live load at or below 0.1, never going
//!   below the initial 29 slots.
//! - Every resize rebuilds from scratch: the new array is allocated first,
//!   live entries are moved and rehashed, tombstones are dropped. A failed
//!   allocation leaves the table untouched.
//!
//! Ownership
//! - The table owns every key (copied in on insert).
//! - Values move in on `insert` and move out on `remove`. Overwritten
//!   values and values still present at drop go to the optional destructor
//!   exactly once, or are dropped when no destructor is set.
//! - A cursor borrows the table, so the table cannot change under it.
//!
//! Errors
//! - Allocation failure is the only error. `insert` returns it together
//!   with the rejected value. Missing keys are `None`.
//!
//! Notes and non-goals
//! - Single-threaded: `Table` is `!Send`/`!Sync` because the destructor
//!   is a boxed `FnMut` with no thread bounds. No locking is done.
//! - Iteration order is slot order and is not stable across resizes.
//! - Keys are always text.

mod cursor;
mod error;
pub mod hash;
mod slot;
mod table;
mod table_proptest;

// Public surface
pub use cursor::{Cursor, Iter};
pub use error::{InsertError, TableError};
pub use table::{Table, GROWTH_FACTOR, INITIAL_CAPACITY, LOW_WATERMARK, MAX_LOAD_FACTOR};
