#![doc = r#"
Time-ordered tracks of musical parameters.

A [`TimedTrack`] describes how one parameter (tempo, time signature, key
signature) changes across a song. Each entry is a [`TimedValue`]: the value
holds from its time until the time of the next entry.

Tracks are filled once and then published:

```text
with_capacity(n) ──► append × n ──► as_read_only() ──► TrackView
```

Appends must arrive in chronological order. A track never re-sorts; an
append that goes back in time is rejected with [`TrackError::OutOfOrder`].

# Example
```rust
# use opsm::prelude::*;
let mut tempos = TimedTrack::with_capacity(2);
tempos.append(0.0, Tempo::new(120.)).unwrap();
tempos.append(8.0, Tempo::new(90.)).unwrap();

assert_eq!(tempos.try_find(4.0), Some(&Tempo::new(120.)));
assert_eq!(tempos.try_find(8.0), Some(&Tempo::new(90.)));
assert_eq!(tempos.try_find(-1.0), None);
```
"#]

mod value;
pub use value::*;

mod view;
pub use view::*;

use core::slice;

use crate::TrackError;

/// A fixed-capacity, append-only sequence of [`TimedValue`]s in
/// non-decreasing time order.
#[derive(Debug, Clone)]
pub struct TimedTrack<T> {
    entries: Vec<TimedValue<T>>,
    capacity: usize,
}

impl<T> TimedTrack<T> {
    /// A track that holds nothing and accepts nothing.
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
            capacity: 0,
        }
    }

    /// Allocate a track that accepts exactly `capacity` appends.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a track sized to an ordered source of known length.
    ///
    /// # Errors
    /// [`TrackError::OutOfOrder`] or [`TrackError::InvalidTime`] if the
    /// source is not chronological.
    pub fn from_entries<I>(items: I) -> Result<Self, TrackError>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator<Item = TimedValue<T>>,
    {
        let items = items.into_iter();
        let mut track = Self::with_capacity(items.len());
        track.append_all(items)?;
        Ok(track)
    }

    /// Number of entries written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fixed number of entries this track accepts
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once every slot has been written
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    fn check_order(&self, time: f64) -> Result<(), TrackError> {
        if time.is_nan() {
            return Err(TrackError::InvalidTime);
        }
        match self.entries.last() {
            Some(last) if time < last.time() => {
                Err(TrackError::OutOfOrder {
                    previous: last.time(),
                    time,
                })
            }
            _ => Ok(()),
        }
    }

    /// Write `value` active from `time` into the next free slot.
    ///
    /// # Errors
    /// - [`TrackError::Full`] if every slot has been written
    /// - [`TrackError::OutOfOrder`] if `time` precedes the last entry
    /// - [`TrackError::InvalidTime`] if `time` is NaN
    pub fn append(&mut self, time: f64, value: T) -> Result<(), TrackError> {
        self.push(TimedValue::new(time, value))
    }

    /// Write an entry into the next free slot. See [`TimedTrack::append`].
    pub fn push(&mut self, entry: TimedValue<T>) -> Result<(), TrackError> {
        if self.is_full() {
            return Err(TrackError::Full {
                capacity: self.capacity,
            });
        }
        self.check_order(entry.time())?;
        self.entries.push(entry);
        Ok(())
    }

    /// Append a chronological batch of entries.
    ///
    /// The batch either lands completely or not at all.
    ///
    /// # Errors
    /// - [`TrackError::Overflow`] if the batch does not fit
    /// - [`TrackError::OutOfOrder`] or [`TrackError::InvalidTime`] if the
    ///   batch is not chronological, or starts before the last entry
    pub fn append_all<I>(&mut self, items: I) -> Result<(), TrackError>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator<Item = TimedValue<T>>,
    {
        let items = items.into_iter();
        let remaining = self.capacity - self.entries.len();
        if items.len() > remaining {
            return Err(TrackError::Overflow {
                requested: items.len(),
                remaining,
            });
        }

        let start = self.entries.len();
        for entry in items {
            if let Err(e) = self.push(entry) {
                self.entries.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Borrow the entries as a read-only [`TrackView`]
    pub fn as_read_only(&self) -> TrackView<'_, T> {
        TrackView::new(&self.entries)
    }

    /// The entries as a slice, in time order
    pub fn as_slice(&self) -> &[TimedValue<T>] {
        &self.entries
    }

    /// Returns the entry at `index`
    pub fn get(&self, index: usize) -> Option<&TimedValue<T>> {
        self.entries.get(index)
    }

    /// Iterate over entries in time order
    pub fn iter(&self) -> slice::Iter<'_, TimedValue<T>> {
        self.entries.iter()
    }

    /// Iterate over the values only
    pub fn values(&self) -> impl ExactSizeIterator<Item = &T> {
        self.as_read_only().values()
    }

    /// The first entry.
    ///
    /// # Errors
    /// [`TrackError::Empty`] if nothing has been written.
    pub fn first(&self) -> Result<&TimedValue<T>, TrackError> {
        self.as_read_only().first()
    }

    /// The value of the first entry.
    ///
    /// # Errors
    /// [`TrackError::Empty`] if nothing has been written.
    pub fn first_value(&self) -> Result<&T, TrackError> {
        self.as_read_only().first_value()
    }

    /// See [`TrackView::try_find_index`]
    pub fn try_find_index(&self, time: f64) -> Option<usize> {
        self.as_read_only().try_find_index(time)
    }

    /// See [`TrackView::try_find`]
    pub fn try_find(&self, time: f64) -> Option<&T> {
        self.as_read_only().try_find(time)
    }
}

impl<T> Default for TimedTrack<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Spare capacity is not part of a track's identity.
impl<T: PartialEq> PartialEq for TimedTrack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a, T> IntoIterator for &'a TimedTrack<T> {
    type Item = &'a TimedValue<T>;
    type IntoIter = slice::Iter<'a, TimedValue<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> TryFrom<Vec<TimedValue<T>>> for TimedTrack<T> {
    type Error = TrackError;
    fn try_from(value: Vec<TimedValue<T>>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

#[cfg(test)]
fn track_of(times: &[f64]) -> TimedTrack<u32> {
    TimedTrack::from_entries(
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| TimedValue::new(t, i as u32)),
    )
    .unwrap()
}

#[test]
fn capacity_law() {
    let mut track = TimedTrack::with_capacity(3);
    for i in 0..3 {
        track.append(i as f64, i).unwrap();
    }
    assert!(track.is_full());
    assert_eq!(
        track.append(3.0, 3).unwrap_err(),
        TrackError::Full { capacity: 3 }
    );
    assert_eq!(track.len(), 3);
}

#[test]
fn zero_capacity_rejects_first_append() {
    let mut track = TimedTrack::empty();
    assert_eq!(
        track.append(0.0, ()).unwrap_err(),
        TrackError::Full { capacity: 0 }
    );
}

#[test]
fn rejects_decreasing_time() {
    let mut track = TimedTrack::with_capacity(3);
    track.append(1.0, 'a').unwrap();
    track.append(1.0, 'b').unwrap();
    assert_eq!(
        track.append(0.5, 'c').unwrap_err(),
        TrackError::OutOfOrder {
            previous: 1.0,
            time: 0.5
        }
    );
    assert_eq!(track.len(), 2);
}

#[test]
fn rejects_nan_time() {
    let mut track = TimedTrack::with_capacity(1);
    assert_eq!(
        track.append(f64::NAN, 0).unwrap_err(),
        TrackError::InvalidTime
    );
    assert!(track.is_empty());
}

#[test]
fn append_all_is_atomic() {
    let mut track = TimedTrack::with_capacity(4);
    track.append(1.0, 0).unwrap();

    let batch = [TimedValue::new(2.0, 1), TimedValue::new(0.5, 2)];
    assert!(matches!(
        track.append_all(batch),
        Err(TrackError::OutOfOrder { .. })
    ));
    assert_eq!(track.len(), 1);

    let too_many = [TimedValue::new(2.0, 1); 4];
    assert_eq!(
        track.append_all(too_many).unwrap_err(),
        TrackError::Overflow {
            requested: 4,
            remaining: 3
        }
    );
    assert_eq!(track.len(), 1);
}

#[test]
fn lookup_law() {
    let track = track_of(&[0.0, 2.0, 2.0, 5.0]);

    assert_eq!(track.try_find_index(-0.1), None);
    assert_eq!(track.try_find_index(0.0), Some(0));
    assert_eq!(track.try_find_index(1.9), Some(0));
    // ties resolve to the latest entry
    assert_eq!(track.try_find_index(2.0), Some(2));
    assert_eq!(track.try_find_index(4.9), Some(2));
    assert_eq!(track.try_find(5.0), Some(&3));
    assert_eq!(track.try_find(1e9), Some(&3));
    assert_eq!(track.try_find(f64::NAN), None);
}

#[test]
fn single_entry_matches_from_its_time() {
    let track = track_of(&[3.0]);
    assert_eq!(track.try_find(2.9), None);
    assert_eq!(track.try_find(3.0), Some(&0));
    assert_eq!(track.try_find(100.0), Some(&0));
}

#[test]
fn empty_track_never_matches() {
    let track = TimedTrack::<u32>::empty();
    assert_eq!(track.try_find(0.0), None);
    assert_eq!(track.first().unwrap_err(), TrackError::Empty);
    assert_eq!(track.first_value().unwrap_err(), TrackError::Empty);
}

#[test]
fn view_mirrors_track() {
    let track = track_of(&[0.0, 1.0, 4.0]);
    let view = track.as_read_only();

    assert_eq!(view.len(), 3);
    assert_eq!(view.first_value(), Ok(&0));
    assert_eq!(view.try_find(3.0), track.try_find(3.0));
    assert_eq!(view.values().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    let times: Vec<f64> = view.into_iter().map(TimedValue::time).collect();
    assert_eq!(times, vec![0.0, 1.0, 4.0]);
}

#[test]
fn equality_ignores_spare_capacity() {
    let mut roomy = TimedTrack::with_capacity(10);
    roomy.append(0.0, 1).unwrap();
    let exact = TimedTrack::try_from(vec![TimedValue::new(0.0, 1)]).unwrap();
    assert_eq!(roomy, exact);
}
