//! Cursor: external iterator over a table's slot array.
//!
//! A cursor holds a shared borrow of its table plus a slot index. Position
//! `capacity` is the terminal position. The borrow keeps the table from
//! being mutated while a cursor is live, so a cursor can never observe a
//! resize or a removal mid-walk. Visit order is slot order, which has no
//! relation to insertion order and changes across resizes.

use crate::table::Table;
use core::iter::FusedIterator;

pub struct Cursor<'a, V> {
    table: &'a Table<V>,
    pos: usize,
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn new(table: &'a Table<V>) -> Self {
        let mut c = Self { table, pos: 0 };
        c.skip_to_occupied();
        c
    }

    /// Move forward until the current slot is occupied or the end is reached.
    /// Returns whether the cursor rests on an entry.
    fn skip_to_occupied(&mut self) -> bool {
        let cap = self.table.capacity();
        while self.pos < cap {
            if self.table.slot(self.pos).is_occupied() {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    /// Step to the next entry. Returns `false` when already at the end or
    /// when the step runs off the end.
    pub fn advance(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.pos += 1;
        self.skip_to_occupied()
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.table.capacity()
    }

    pub fn key(&self) -> Option<&'a str> {
        self.entry().map(|(k, _)| k)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, v)| v)
    }

    pub fn entry(&self) -> Option<(&'a str, &'a V)> {
        if self.at_end() {
            return None;
        }
        let table: &'a Table<V> = self.table;
        table.slot(self.pos).entry()
    }
}

impl<'a, V> Clone for Cursor<'a, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            pos: self.pos,
        }
    }
}

/// `Iterator` adapter over a [`Cursor`], yielding `(key, value)` pairs.
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(cursor: Cursor<'a, V>) -> Self {
        let remaining = cursor.table.len();
        Self { cursor, remaining }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.entry()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}
impl<'a, V> FusedIterator for Iter<'a, V> {}
