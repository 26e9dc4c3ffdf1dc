//! Table: open-addressing storage with linear probing and tombstones.

use crate::cursor::{Cursor, Iter};
use crate::error::{InsertError, TableError};
use crate::hash::bucket;
use crate::slot::Slot;
use core::fmt;
use log::{debug, trace, warn};

/// Slots in a freshly created table. Also the floor for shrinking.
pub const INITIAL_CAPACITY: usize = 29;
/// Capacity multiplier on grow and divisor on shrink.
pub const GROWTH_FACTOR: usize = 5;
/// Projected load above which `insert` grows the table first.
pub const MAX_LOAD_FACTOR: f64 = 0.7;
/// Load at or below which `remove` shrinks the table first.
pub const LOW_WATERMARK: f64 = 0.1;

type Destructor<V> = Box<dyn FnMut(V)>;

/// Map from string keys to owned values of type `V`.
///
/// Values handed to `insert` belong to the table until they are either
/// moved back out by `remove`, or released through the destructor when
/// overwritten or when the table is dropped. Without a destructor they are
/// simply dropped at those points.
///
/// Not thread-safe; the destructor is not required to be `Send`.
pub struct Table<V> {
    slots: Vec<Slot<V>>,
    len: usize,
    tombstones: usize,
    destructor: Option<Destructor<V>>,
    // Makes every slot-array and key allocation fail.
    #[cfg(test)]
    fail_alloc: bool,
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self::from_parts(empty_slots(INITIAL_CAPACITY), None)
    }

    /// Create a table that passes every overwritten or dropped value to `f`.
    pub fn with_destructor<F>(f: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        Self::from_parts(empty_slots(INITIAL_CAPACITY), Some(Box::new(f) as Destructor<V>))
    }

    /// Like [`Table::new`], but reports allocation failure instead of aborting.
    pub fn try_new() -> Result<Self, TableError> {
        Ok(Self::from_parts(try_empty_slots(INITIAL_CAPACITY)?, None))
    }

    pub fn try_with_destructor<F>(f: F) -> Result<Self, TableError>
    where
        F: FnMut(V) + 'static,
    {
        Ok(Self::from_parts(
            try_empty_slots(INITIAL_CAPACITY)?,
            Some(Box::new(f) as Destructor<V>),
        ))
    }

    fn from_parts(slots: Vec<Slot<V>>, destructor: Option<Destructor<V>>) -> Self {
        Self {
            slots,
            len: 0,
            tombstones: 0,
            destructor,
            #[cfg(test)]
            fail_alloc: false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated. Never zero.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Probe for `key` starting at its home slot.
    ///
    /// Returns `(index, true)` for the slot holding `key`, or `(index, false)`
    /// for the first Empty slot on the probe path. Tombstones never stop the
    /// scan. Terminates because every table keeps at least one Empty slot.
    fn locate(&self, key: &str) -> (usize, bool) {
        let cap = self.capacity();
        let mut i = bucket(key, cap);
        loop {
            let slot = &self.slots[i];
            if slot.is_empty() {
                return (i, false);
            }
            if slot.holds(key) {
                return (i, true);
            }
            i += 1;
            if i == cap {
                i = 0;
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.locate(key).1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match self.locate(key) {
            (i, true) => match &self.slots[i] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.locate(key) {
            (i, true) => match &mut self.slots[i] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Store `value` under `key`.
    ///
    /// An existing value for `key` is replaced in place and passed to the
    /// destructor; `len` and capacity are unchanged and nothing is allocated.
    /// A new key may first grow the table. On allocation failure the table is
    /// left exactly as it was and the value comes back inside the error.
    pub fn insert(&mut self, key: &str, value: V) -> Result<(), InsertError<V>> {
        let (mut i, found) = self.locate(key);
        if found {
            if let Slot::Occupied { value: v, .. } = &mut self.slots[i] {
                let old = core::mem::replace(v, value);
                // Slot already holds the new value; user code runs on a consistent table.
                self.release(old);
            }
            return Ok(());
        }

        match self.reserve_one() {
            Ok(true) => i = self.locate(key).0,
            Ok(false) => {}
            Err(e) => {
                warn!("insert of {:?} aborted: {}", key, e);
                return Err(InsertError::new(e, value));
            }
        }

        let owned = match self.copy_key(key) {
            Ok(k) => k,
            Err(e) => {
                warn!("insert of {:?} aborted: {}", key, e);
                return Err(InsertError::new(e, value));
            }
        };
        self.slots[i] = Slot::Occupied { key: owned, value };
        self.len += 1;
        Ok(())
    }

    /// Remove `key` and move its value out to the caller.
    ///
    /// The destructor is not invoked; ownership of the value transfers back.
    /// If the shrink this removal triggers cannot allocate, the table keeps
    /// its current storage and the removal still succeeds.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let (mut i, found) = self.locate(key);
        if !found {
            return None;
        }

        if let Some(new_cap) = self.shrink_target() {
            match self.resize(new_cap) {
                Ok(()) => i = self.locate(key).0,
                Err(e) => warn!("shrink to {} slots skipped: {}", new_cap, e),
            }
        }

        match core::mem::replace(&mut self.slots[i], Slot::Deleted) {
            Slot::Occupied { value, .. } => {
                self.len -= 1;
                self.tombstones += 1;
                Some(value)
            }
            other => {
                // Unreachable while the probe invariant holds; restore and report absent.
                self.slots[i] = other;
                None
            }
        }
    }

    /// Cursor positioned on the first live entry, or at the end.
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor::new(self)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.cursor())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub(crate) fn slot(&self, i: usize) -> &Slot<V> {
        &self.slots[i]
    }

    /// Make sure one more entry fits without breaking the watermark.
    /// Returns whether the table was rebuilt.
    ///
    /// Grows when the projected live load exceeds the watermark; otherwise
    /// rebuilds in place when tombstones alone would crowd out Empty slots.
    fn reserve_one(&mut self) -> Result<bool, TableError> {
        let cap = self.capacity();
        let limit = cap as f64 * MAX_LOAD_FACTOR;
        if (self.len + 1) as f64 > limit {
            let new_cap = cap
                .checked_mul(GROWTH_FACTOR)
                .ok_or(TableError::CapacityOverflow { capacity: cap })?;
            self.resize(new_cap)?;
            return Ok(true);
        }
        if (self.len + self.tombstones + 1) as f64 > limit {
            trace!(
                "reclaiming {} tombstones at capacity {}",
                self.tombstones,
                cap
            );
            self.resize(cap)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn shrink_target(&self) -> Option<usize> {
        let cap = self.capacity();
        let new_cap = cap / GROWTH_FACTOR;
        if new_cap < INITIAL_CAPACITY {
            return None;
        }
        if self.len as f64 <= cap as f64 * LOW_WATERMARK {
            Some(new_cap)
        } else {
            None
        }
    }

    /// Rebuild into `new_cap` slots, rehashing every live entry.
    ///
    /// The new array is allocated before anything is touched, so a failure
    /// leaves the table as it was. Tombstones are not carried over.
    fn resize(&mut self, new_cap: usize) -> Result<(), TableError> {
        debug_assert!(new_cap > self.len, "resize would not fit live entries");
        let fresh = self.alloc_slots(new_cap)?;
        let old = core::mem::replace(&mut self.slots, fresh);
        debug!(
            "resizing table {} -> {} slots ({} live, {} tombstones dropped)",
            old.len(),
            new_cap,
            self.len,
            self.tombstones
        );
        let live = self.len;
        self.len = 0;
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                self.place(key, value);
            }
        }
        debug_assert_eq!(self.len, live);
        Ok(())
    }

    fn alloc_slots(&self, n: usize) -> Result<Vec<Slot<V>>, TableError> {
        #[cfg(test)]
        {
            if self.fail_alloc {
                return try_empty_slots(usize::MAX);
            }
        }
        try_empty_slots(n)
    }

    fn copy_key(&self, key: &str) -> Result<String, TableError> {
        #[cfg(test)]
        {
            if self.fail_alloc {
                return copy_key_reserving(key, usize::MAX);
            }
        }
        copy_key_reserving(key, key.len())
    }

    /// Insert an owned key known to be absent, without load checks.
    fn place(&mut self, key: String, value: V) {
        let (i, found) = self.locate(&key);
        debug_assert!(!found, "duplicate key during rebuild");
        self.slots[i] = Slot::Occupied { key, value };
        self.len += 1;
    }

    fn release(&mut self, value: V) {
        match self.destructor.as_mut() {
            Some(f) => f(value),
            None => drop(value),
        }
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for Table<V> {
    fn drop(&mut self) {
        let Some(mut f) = self.destructor.take() else {
            return;
        };
        for slot in self.slots.drain(..) {
            if let Slot::Occupied { value, .. } = slot {
                f(value);
            }
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Table<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a Table<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn empty_slots<V>(n: usize) -> Vec<Slot<V>> {
    let mut v = Vec::with_capacity(n);
    v.resize_with(n, || Slot::Empty);
    v
}

fn try_empty_slots<V>(n: usize) -> Result<Vec<Slot<V>>, TableError> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|source| TableError::SlotAlloc { slots: n, source })?;
    v.resize_with(n, || Slot::Empty);
    Ok(v)
}

fn copy_key_reserving(key: &str, additional: usize) -> Result<String, TableError> {
    let mut s = String::new();
    s.try_reserve_exact(additional)
        .map_err(|source| TableError::KeyAlloc {
            len: key.len(),
            source,
        })?;
    s.push_str(key);
    Ok(s)
}
