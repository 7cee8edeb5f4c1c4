use core::slice;

use super::TimedValue;
use crate::TrackError;

/// A read-only view over the entries of a [`TimedTrack`](super::TimedTrack).
///
/// The view borrows the track's storage, so it can never outlive the track
/// that produced it. It is `Copy`, and cheap to hand out.
#[derive(Debug, PartialEq)]
pub struct TrackView<'a, T> {
    entries: &'a [TimedValue<T>],
}

// derived impls would require `T: Copy`
impl<T> Clone for TrackView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for TrackView<'_, T> {}

impl<'a, T> TrackView<'a, T> {
    pub(super) const fn new(entries: &'a [TimedValue<T>]) -> Self {
        Self { entries }
    }

    /// Number of entries
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries as a slice, in time order
    pub const fn as_slice(&self) -> &'a [TimedValue<T>] {
        self.entries
    }

    /// Returns the entry at `index`
    pub fn get(&self, index: usize) -> Option<&'a TimedValue<T>> {
        self.entries.get(index)
    }

    /// Iterate over entries in time order
    pub fn iter(&self) -> slice::Iter<'a, TimedValue<T>> {
        self.entries.iter()
    }

    /// Iterate over the values only, in time order
    pub fn values(self) -> impl ExactSizeIterator<Item = &'a T> {
        self.entries.iter().map(TimedValue::value)
    }

    /// The first entry.
    ///
    /// # Errors
    /// [`TrackError::Empty`] if there are no entries.
    pub fn first(&self) -> Result<&'a TimedValue<T>, TrackError> {
        self.entries.first().ok_or(TrackError::Empty)
    }

    /// The value of the first entry.
    ///
    /// # Errors
    /// [`TrackError::Empty`] if there are no entries.
    pub fn first_value(&self) -> Result<&'a T, TrackError> {
        self.first().map(TimedValue::value)
    }

    /// Index of the entry active at `time`: the last entry whose time is
    /// less than or equal to `time`.
    ///
    /// Returns `None` if the track is empty or `time` precedes the first entry.
    ///
    /// Track lengths are bounded by the 16-bit count of the wire format, so
    /// this is a linear scan.
    pub fn try_find_index(&self, time: f64) -> Option<usize> {
        self.entries
            .iter()
            .take_while(|entry| entry.time() <= time)
            .count()
            .checked_sub(1)
    }

    /// The value active at `time`. See [`TrackView::try_find_index`].
    pub fn try_find(&self, time: f64) -> Option<&'a T> {
        self.try_find_index(time)
            .map(|index| self.entries[index].value())
    }
}

impl<'a, T> IntoIterator for TrackView<'a, T> {
    type Item = &'a TimedValue<T>;
    type IntoIter = slice::Iter<'a, TimedValue<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
