/// One cell of the table's backing array.
#[derive(Debug)]
pub(crate) enum Slot<V> {
    /// Never written since the last rebuild. Terminates a probe.
    Empty,
    Occupied { key: String, value: V },
    /// Tombstone left by `remove`. Probes walk past it.
    Deleted,
}

impl<V> Slot<V> {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    #[inline]
    pub(crate) fn holds(&self, k: &str) -> bool {
        match self {
            Slot::Occupied { key, .. } => key == k,
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&str, &V)> {
        match self {
            Slot::Occupied { key, value } => Some((key.as_str(), value)),
            _ => None,
        }
    }
}
