//! Error types. Allocation failure is the only error this crate reports;
//! missing keys are `None`.

use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("failed to allocate a table of {slots} slots")]
    SlotAlloc {
        slots: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("failed to copy a key of {len} bytes")]
    KeyAlloc {
        len: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("capacity overflow resizing a table of {capacity} slots")]
    CapacityOverflow { capacity: usize },
}

/// A rejected insert. The table is unchanged and the value is handed back.
#[derive(Error)]
#[error("insert failed: {error}")]
pub struct InsertError<V> {
    #[source]
    error: TableError,
    value: V,
}

impl<V> InsertError<V> {
    pub(crate) fn new(error: TableError, value: V) -> Self {
        Self { error, value }
    }

    pub fn error(&self) -> &TableError {
        &self.error
    }

    /// Take back ownership of the value that could not be stored.
    pub fn into_value(self) -> V {
        self.value
    }

    pub fn into_parts(self) -> (TableError, V) {
        (self.error, self.value)
    }
}

// Manual so that `V` needs no `Debug` bound.
impl<V> fmt::Debug for InsertError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn reserve_error() -> TryReserveError {
        Vec::<u8>::new()
            .try_reserve_exact(usize::MAX)
            .expect_err("reserving usize::MAX bytes must fail")
    }

    #[test]
    fn insert_error_hands_value_back() {
        let e = InsertError::new(TableError::CapacityOverflow { capacity: 7 }, vec![1, 2, 3]);
        assert_eq!(e.error(), &TableError::CapacityOverflow { capacity: 7 });
        assert_eq!(e.into_value(), vec![1, 2, 3]);
    }

    #[test]
    fn display_and_source_chain() {
        let e = InsertError::new(
            TableError::KeyAlloc { len: 12, source: reserve_error() },
            (),
        );
        assert_eq!(e.to_string(), "insert failed: failed to copy a key of 12 bytes");
        let src = e.source().expect("table error is the source");
        assert!(src.source().is_some(), "reserve error is chained");
        assert!(format!("{:?}", e).starts_with("InsertError"));
    }
}
