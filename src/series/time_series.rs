use std::cmp::Ordering;
use std::fmt;

use thiserror::Error as ThisError;

use super::columns::FieldColumns;
use crate::models::TickField;

/// Errors from [`TimeSeries`] operations.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("key not present in series")]
    KeyNotFound,

    #[error("an entry with the same key is already present")]
    DuplicateKey,

    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("field {0} was not declared for this series")]
    ColumnMissing(TickField),

    #[error("field {0} was supplied twice")]
    DuplicateColumn(TickField),

    #[error("keys are not strictly ascending at index {index}")]
    UnsortedKeys { index: usize },

    #[error("column {field} has {actual} entries but the series has {expected} keys")]
    ColumnLengthMismatch {
        field: TickField,
        expected: usize,
        actual: usize,
    },
}

/// Capacity of the first allocation.
const BASELINE_CAPACITY: usize = 4;

/// Largest capacity the growth policy will request; keeps the doubling
/// arithmetic clear of overflow.
const MAX_CAPACITY: usize = 0x7FEF_FFFF;

/// Columnar sorted time series: one strictly ascending key vector plus
/// parallel per-field value columns.
///
/// Behaves like a tiny embedded time-series table. Lookups are binary
/// searches over the key array, a row is addressed by one index across every
/// column, and bulk consumers read the live backing slices directly, so
/// there is no per-element indirection anywhere on the read path. Two
/// element-type families keep price-like (`V1`) and count-like (`V2`)
/// columns unboxed side by side under the shared key array; the resident
/// daily instantiation is [`DailySeries`](crate::series::DailySeries).
///
/// Keys are unique. Ordering is whatever the comparer says (natural `Ord`
/// by default); the container never interprets `K` itself.
pub struct TimeSeries<K, V1, V2> {
    keys: Vec<K>,
    values: FieldColumns<V1>,
    qtys: FieldColumns<V2>,
    compare: fn(&K, &K) -> Ordering,
}

impl<K: Ord, V1, V2> TimeSeries<K, V1, V2> {
    /// Empty series with the given columns declared up front, ordered by
    /// `K`'s natural ordering.
    pub fn new(value_fields: &[TickField], qty_fields: &[TickField]) -> Self {
        Self::with_comparer(value_fields, qty_fields, K::cmp)
    }

    /// Builds a series from pre-sorted columns fetched in bulk.
    ///
    /// Keys must be strictly ascending and every column must match their
    /// length; both are validated because a series built from unsorted keys
    /// would quietly break every later binary search.
    pub fn from_sorted(
        keys: Vec<K>,
        value_columns: Vec<(TickField, Vec<V1>)>,
        qty_columns: Vec<(TickField, Vec<V2>)>,
    ) -> Result<Self, SeriesError> {
        Self::from_sorted_with_comparer(keys, value_columns, qty_columns, K::cmp)
    }
}

impl<K, V1, V2> TimeSeries<K, V1, V2> {
    /// Like [`TimeSeries::new`] with a custom key ordering. Every lookup,
    /// insertion point, and bulk validation goes through `compare`.
    pub fn with_comparer(
        value_fields: &[TickField],
        qty_fields: &[TickField],
        compare: fn(&K, &K) -> Ordering,
    ) -> Self {
        Self {
            keys: Vec::new(),
            values: FieldColumns::new(value_fields),
            qtys: FieldColumns::new(qty_fields),
            compare,
        }
    }

    /// Bulk constructor under a custom ordering; see [`TimeSeries::from_sorted`].
    pub fn from_sorted_with_comparer(
        keys: Vec<K>,
        value_columns: Vec<(TickField, Vec<V1>)>,
        qty_columns: Vec<(TickField, Vec<V2>)>,
        compare: fn(&K, &K) -> Ordering,
    ) -> Result<Self, SeriesError> {
        for index in 1..keys.len() {
            if compare(&keys[index - 1], &keys[index]) != Ordering::Less {
                return Err(SeriesError::UnsortedKeys { index });
            }
        }

        let mut values = FieldColumns::new(&[]);
        for (field, column) in value_columns {
            if column.len() != keys.len() {
                return Err(SeriesError::ColumnLengthMismatch {
                    field,
                    expected: keys.len(),
                    actual: column.len(),
                });
            }
            if values.set(field, column).is_some() {
                return Err(SeriesError::DuplicateColumn(field));
            }
        }

        let mut qtys = FieldColumns::new(&[]);
        for (field, column) in qty_columns {
            if column.len() != keys.len() {
                return Err(SeriesError::ColumnLengthMismatch {
                    field,
                    expected: keys.len(),
                    actual: column.len(),
                });
            }
            if qtys.set(field, column).is_some() {
                return Err(SeriesError::DuplicateColumn(field));
            }
        }

        Ok(Self {
            keys,
            values,
            qtys,
            compare,
        })
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Allocated row slots across the key array and every column.
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    /// Index of `key`, or `None` when the key is absent (weekends, holidays).
    pub fn index_of_key(&self, key: &K) -> Option<usize> {
        self.search(key).ok()
    }

    /// Index of `key`, or of the largest key before it when `key` itself is
    /// absent. `None` only when every stored key is larger. Resolves "most
    /// recent prior trading day" semantics.
    pub fn index_of_key_or_before(&self, key: &K) -> Option<usize> {
        match self.search(key) {
            Ok(index) => Some(index),
            Err(0) => None,
            Err(insertion) => Some(insertion - 1),
        }
    }

    /// The live key array. Zero-copy bulk read path.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The live column for a price-family field.
    pub fn values(&self, field: TickField) -> Result<&[V1], SeriesError> {
        self.values
            .get(field)
            .map(Vec::as_slice)
            .ok_or(SeriesError::ColumnMissing(field))
    }

    /// The live column for a count-family field.
    pub fn qtys(&self, field: TickField) -> Result<&[V2], SeriesError> {
        self.qtys
            .get(field)
            .map(Vec::as_slice)
            .ok_or(SeriesError::ColumnMissing(field))
    }

    /// Removes the row at `index`, shifting later rows left in lock-step
    /// across the key array and every column.
    pub fn remove_at(&mut self, index: usize) -> Result<(), SeriesError> {
        if index >= self.keys.len() {
            return Err(SeriesError::IndexOutOfRange {
                index,
                len: self.keys.len(),
            });
        }
        self.keys.remove(index);
        for column in self.values.iter_mut() {
            column.remove(index);
        }
        for column in self.qtys.iter_mut() {
            column.remove(index);
        }
        Ok(())
    }

    /// Removes the row keyed `key`; `false` when the key is absent.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.search(key) {
            Ok(index) => self.remove_at(index).is_ok(),
            Err(_) => false,
        }
    }

    /// Gives back slack capacity once utilization falls under 90%. No-op
    /// otherwise, so steady-state refreshes never thrash the allocator.
    pub fn trim_excess(&mut self) {
        if self.keys.len() * 10 >= self.capacity() * 9 {
            return;
        }
        self.keys.shrink_to_fit();
        for column in self.values.iter_mut() {
            column.shrink_to_fit();
        }
        for column in self.qtys.iter_mut() {
            column.shrink_to_fit();
        }
    }

    /// Resident bytes of the backing arrays, counting capacity rather than
    /// length.
    pub fn resident_bytes(&self) -> usize {
        let mut total = self.keys.capacity() * std::mem::size_of::<K>();
        for (_, column) in self.values.iter() {
            total += column.capacity() * std::mem::size_of::<V1>();
        }
        for (_, column) in self.qtys.iter() {
            total += column.capacity() * std::mem::size_of::<V2>();
        }
        total
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        let compare = self.compare;
        self.keys.binary_search_by(|probe| compare(probe, key))
    }

    /// Grows every backing array to at least `min` slots using the doubling
    /// policy: baseline 4, doubled, capped, then clamped up to `min`. Run
    /// before a row insert so the vector inserts never reallocate on their
    /// own schedule.
    fn ensure_capacity(&mut self, min: usize) {
        let current = self.keys.capacity();
        if current >= min {
            return;
        }
        let mut target = if current == 0 {
            BASELINE_CAPACITY
        } else {
            current * 2
        };
        if target > MAX_CAPACITY {
            target = MAX_CAPACITY;
        }
        if target < min {
            target = min;
        }
        self.keys.reserve_exact(target - self.keys.len());
        for column in self.values.iter_mut() {
            let additional = target - column.len();
            column.reserve_exact(additional);
        }
        for column in self.qtys.iter_mut() {
            let additional = target - column.len();
            column.reserve_exact(additional);
        }
    }
}

impl<K, V1: Copy + Default, V2: Copy + Default> TimeSeries<K, V1, V2> {
    /// Value of a price-family field at exactly `key`.
    pub fn value(&self, key: &K, field: TickField) -> Result<V1, SeriesError> {
        let column = self
            .values
            .get(field)
            .ok_or(SeriesError::ColumnMissing(field))?;
        let index = self.search(key).map_err(|_| SeriesError::KeyNotFound)?;
        Ok(column[index])
    }

    /// Non-failing variant of [`TimeSeries::value`].
    pub fn try_value(&self, key: &K, field: TickField) -> Option<V1> {
        let column = self.values.get(field)?;
        let index = self.search(key).ok()?;
        Some(column[index])
    }

    /// Value of a count-family field at exactly `key`.
    pub fn qty(&self, key: &K, field: TickField) -> Result<V2, SeriesError> {
        let column = self
            .qtys
            .get(field)
            .ok_or(SeriesError::ColumnMissing(field))?;
        let index = self.search(key).map_err(|_| SeriesError::KeyNotFound)?;
        Ok(column[index])
    }

    /// Non-failing variant of [`TimeSeries::qty`].
    pub fn try_qty(&self, key: &K, field: TickField) -> Option<V2> {
        let column = self.qtys.get(field)?;
        let index = self.search(key).ok()?;
        Some(column[index])
    }

    /// Inserts a new key with `value` in `field`'s column.
    ///
    /// Every other declared column gets its default at the new slot; filling
    /// the row coherently across columns is the caller's job. A key already
    /// in the series is always an error, never an update.
    pub fn insert_value(&mut self, key: K, field: TickField, value: V1) -> Result<(), SeriesError> {
        if self.values.get(field).is_none() {
            return Err(SeriesError::ColumnMissing(field));
        }
        let at = match self.search(&key) {
            Ok(_) => return Err(SeriesError::DuplicateKey),
            Err(at) => at,
        };
        self.insert_row(at, key);
        if let Some(column) = self.values.get_mut(field) {
            column[at] = value;
        }
        Ok(())
    }

    /// Count-family counterpart of [`TimeSeries::insert_value`].
    pub fn insert_qty(&mut self, key: K, field: TickField, value: V2) -> Result<(), SeriesError> {
        if self.qtys.get(field).is_none() {
            return Err(SeriesError::ColumnMissing(field));
        }
        let at = match self.search(&key) {
            Ok(_) => return Err(SeriesError::DuplicateKey),
            Err(at) => at,
        };
        self.insert_row(at, key);
        if let Some(column) = self.qtys.get_mut(field) {
            column[at] = value;
        }
        Ok(())
    }

    /// Opens a defaulted row at `at`, shifting the key array and every
    /// column rightward in lock-step.
    fn insert_row(&mut self, at: usize, key: K) {
        let needed = self.keys.len() + 1;
        self.ensure_capacity(needed);
        self.keys.insert(at, key);
        for column in self.values.iter_mut() {
            column.insert(at, V1::default());
        }
        for column in self.qtys.iter_mut() {
            column.insert(at, V2::default());
        }
    }
}

impl<K, V1, V2> fmt::Debug for TimeSeries<K, V1, V2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSeries")
            .field("len", &self.keys.len())
            .field("capacity", &self.keys.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store() -> TimeSeries<u32, f32, u64> {
        TimeSeries::new(&[TickField::Close, TickField::AdjClose], &[TickField::Volume])
    }

    fn seeded() -> TimeSeries<u32, f32, u64> {
        TimeSeries::from_sorted(
            vec![2, 4, 6],
            vec![
                (TickField::Close, vec![1.0, 2.0, 3.0]),
                (TickField::AdjClose, vec![0.9, 1.9, 2.9]),
            ],
            vec![(TickField::Volume, vec![10, 20, 30])],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_store() {
        let series = store();
        assert_eq!(series.len(), 0);
        assert!(series.is_empty());
        assert_eq!(series.capacity(), 0);
        assert_eq!(series.index_of_key(&7), None);
        assert_eq!(series.index_of_key_or_before(&7), None);
        assert_eq!(series.try_value(&7, TickField::Close), None);
        assert_eq!(
            series.value(&7, TickField::Close),
            Err(SeriesError::KeyNotFound)
        );
    }

    #[test]
    fn test_insert_then_get() {
        let mut series = store();
        series.insert_value(4, TickField::Close, 2.5).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.index_of_key(&4), Some(0));
        assert_eq!(series.value(&4, TickField::Close), Ok(2.5));
        assert_eq!(series.try_value(&4, TickField::Close), Some(2.5));
    }

    #[test]
    fn test_insert_defaults_the_other_columns() {
        let mut series = store();
        series.insert_value(4, TickField::Close, 2.5).unwrap();
        assert_eq!(series.values(TickField::AdjClose).unwrap(), &[0.0]);
        assert_eq!(series.qtys(TickField::Volume).unwrap(), &[0]);
    }

    #[test]
    fn test_insert_into_undeclared_column_is_rejected_before_any_shift() {
        let mut series = store();
        series.insert_value(2, TickField::Close, 1.0).unwrap();
        assert_eq!(
            series.insert_value(4, TickField::Open, 1.0),
            Err(SeriesError::ColumnMissing(TickField::Open))
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series.keys(), &[2]);
    }

    #[test]
    fn test_duplicate_insert_leaves_store_unmodified() {
        let mut series = seeded();
        let keys_before = series.keys().to_vec();
        let closes_before = series.values(TickField::Close).unwrap().to_vec();

        assert_eq!(
            series.insert_value(4, TickField::Close, 9.9),
            Err(SeriesError::DuplicateKey)
        );
        assert_eq!(
            series.insert_qty(4, TickField::Volume, 99),
            Err(SeriesError::DuplicateKey)
        );

        assert_eq!(series.keys(), keys_before.as_slice());
        assert_eq!(
            series.values(TickField::Close).unwrap(),
            closes_before.as_slice()
        );
    }

    #[test]
    fn test_lookup_round_trip_survives_unrelated_edits() {
        let mut series = store();
        series.insert_value(10, TickField::Close, 1.25).unwrap();
        series.insert_value(5, TickField::Close, 0.5).unwrap();
        series.insert_value(20, TickField::Close, 2.0).unwrap();
        series.insert_value(15, TickField::Close, 1.5).unwrap();
        assert!(series.remove(&5));
        assert_eq!(series.value(&10, TickField::Close), Ok(1.25));
        assert_eq!(series.value(&15, TickField::Close), Ok(1.5));
    }

    #[test]
    fn test_index_of_key_or_before_boundaries() {
        let series = seeded();
        assert_eq!(
            series.index_of_key_or_before(&5),
            series.index_of_key(&4),
            "missing key resolves to the nearest smaller key"
        );
        assert_eq!(series.index_of_key_or_before(&1), None);
        assert_eq!(series.index_of_key_or_before(&4), series.index_of_key(&4));
        assert_eq!(series.index_of_key_or_before(&2), Some(0));
        assert_eq!(series.index_of_key_or_before(&7), series.index_of_key(&6));
    }

    #[test]
    fn test_remove_shifts_rows_in_lock_step() {
        let mut series = seeded();
        assert!(series.remove(&4));
        assert_eq!(series.keys(), &[2, 6]);
        assert_eq!(series.values(TickField::Close).unwrap(), &[1.0, 3.0]);
        assert_eq!(series.values(TickField::AdjClose).unwrap(), &[0.9, 2.9]);
        assert_eq!(series.qtys(TickField::Volume).unwrap(), &[10, 30]);
    }

    #[test]
    fn test_remove_absent_returns_false() {
        let mut series = seeded();
        assert!(!series.remove(&5));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut series = seeded();
        assert_eq!(
            series.remove_at(3),
            Err(SeriesError::IndexOutOfRange { index: 3, len: 3 })
        );
        let mut empty = store();
        assert_eq!(
            empty.remove_at(0),
            Err(SeriesError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_capacity_growth_policy() {
        let mut series = store();
        let mut observed = Vec::new();
        for key in 0..9u32 {
            series.insert_value(key, TickField::Close, 0.0).unwrap();
            observed.push(series.capacity());
        }
        assert_eq!(observed, vec![4, 4, 4, 4, 8, 8, 8, 8, 16]);

        // Removal never shrinks; only trim_excess may.
        series.remove_at(0).unwrap();
        assert_eq!(series.capacity(), 16);
    }

    #[test]
    fn test_growth_never_reorders() {
        let mut series = store();
        for key in [9u32, 3, 7, 1, 8, 2, 6, 0, 5, 4] {
            series.insert_value(key, TickField::Close, key as f32).unwrap();
        }
        assert_eq!(series.keys(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        for key in 0..10u32 {
            assert_eq!(series.try_value(&key, TickField::Close), Some(key as f32));
        }
    }

    #[test]
    fn test_trim_excess_below_threshold() {
        let mut series = store();
        for key in 0..5u32 {
            series.insert_value(key, TickField::Close, 0.0).unwrap();
        }
        assert_eq!(series.capacity(), 8);
        series.trim_excess();
        assert_eq!(series.capacity(), 5);
        assert_eq!(series.keys(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_trim_excess_noop_at_high_utilization() {
        let mut series = store();
        for key in 0..15u32 {
            series.insert_value(key, TickField::Close, 0.0).unwrap();
        }
        // 15 of 16 slots used is above the 90% threshold.
        assert_eq!(series.capacity(), 16);
        series.trim_excess();
        assert_eq!(series.capacity(), 16);

        let mut empty = store();
        empty.trim_excess();
        assert_eq!(empty.capacity(), 0);
    }

    #[test]
    fn test_from_sorted_reads_back() {
        let series = seeded();
        assert_eq!(series.len(), 3);
        assert_eq!(series.keys(), &[2, 4, 6]);
        assert_eq!(series.value(&4, TickField::AdjClose), Ok(1.9));
        assert_eq!(series.qty(&6, TickField::Volume), Ok(30));
    }

    #[test]
    fn test_from_sorted_rejects_unsorted_and_duplicate_keys() {
        let unsorted = TimeSeries::<u32, f32, u64>::from_sorted(
            vec![2, 1],
            vec![(TickField::Close, vec![1.0, 2.0])],
            vec![],
        );
        assert_eq!(unsorted.unwrap_err(), SeriesError::UnsortedKeys { index: 1 });

        let duplicated = TimeSeries::<u32, f32, u64>::from_sorted(
            vec![2, 2, 3],
            vec![(TickField::Close, vec![1.0, 2.0, 3.0])],
            vec![],
        );
        assert_eq!(
            duplicated.unwrap_err(),
            SeriesError::UnsortedKeys { index: 1 }
        );
    }

    #[test]
    fn test_from_sorted_rejects_length_mismatch() {
        let result = TimeSeries::<u32, f32, u64>::from_sorted(
            vec![1, 2, 3],
            vec![(TickField::Close, vec![1.0, 2.0])],
            vec![],
        );
        assert_eq!(
            result.unwrap_err(),
            SeriesError::ColumnLengthMismatch {
                field: TickField::Close,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_from_sorted_rejects_duplicate_column() {
        let result = TimeSeries::<u32, f32, u64>::from_sorted(
            vec![1, 2],
            vec![
                (TickField::Close, vec![1.0, 2.0]),
                (TickField::Close, vec![3.0, 4.0]),
            ],
            vec![],
        );
        assert_eq!(
            result.unwrap_err(),
            SeriesError::DuplicateColumn(TickField::Close)
        );
    }

    #[test]
    fn test_custom_comparer_drives_ordering() {
        fn descending(a: &u32, b: &u32) -> Ordering {
            b.cmp(a)
        }

        let mut series: TimeSeries<u32, f32, u64> =
            TimeSeries::with_comparer(&[TickField::Close], &[], descending);
        for key in [1u32, 3, 2] {
            series.insert_value(key, TickField::Close, key as f32).unwrap();
        }
        assert_eq!(series.keys(), &[3, 2, 1]);
        assert_eq!(series.index_of_key(&2), Some(1));

        // Bulk validation follows the same ordering.
        assert!(TimeSeries::<u32, f32, u64>::from_sorted_with_comparer(
            vec![3, 2, 1],
            vec![(TickField::Close, vec![1.0, 2.0, 3.0])],
            vec![],
            descending,
        )
        .is_ok());
        assert_eq!(
            TimeSeries::<u32, f32, u64>::from_sorted_with_comparer(
                vec![1, 2, 3],
                vec![(TickField::Close, vec![1.0, 2.0, 3.0])],
                vec![],
                descending,
            )
            .unwrap_err(),
            SeriesError::UnsortedKeys { index: 1 }
        );
    }

    #[test]
    fn test_qty_inserts_share_the_key_space() {
        let mut series = store();
        series.insert_value(4, TickField::Close, 2.5).unwrap();
        series.insert_qty(6, TickField::Volume, 1_000).unwrap();

        // One key space across both families: 4 is taken either way.
        assert_eq!(
            series.insert_qty(4, TickField::Volume, 9),
            Err(SeriesError::DuplicateKey)
        );
        assert_eq!(series.qty(&6, TickField::Volume), Ok(1_000));
        assert_eq!(series.try_qty(&4, TickField::Volume), Some(0));
    }

    #[test]
    fn test_missing_key_and_missing_column_are_distinct() {
        let series = seeded();
        assert_eq!(
            series.value(&5, TickField::Close),
            Err(SeriesError::KeyNotFound)
        );
        // Volume lives in the count family, not the price family.
        assert_eq!(
            series.value(&4, TickField::Volume),
            Err(SeriesError::ColumnMissing(TickField::Volume))
        );
        assert_eq!(
            series.qtys(TickField::Close).unwrap_err(),
            SeriesError::ColumnMissing(TickField::Close)
        );
    }

    #[test]
    fn test_resident_bytes_tracks_capacity() {
        let mut series = store();
        for key in 0..5u32 {
            series.insert_value(key, TickField::Close, 0.0).unwrap();
        }
        let per_row = std::mem::size_of::<u32>()
            + 2 * std::mem::size_of::<f32>()
            + std::mem::size_of::<u64>();
        assert_eq!(series.resident_bytes(), series.capacity() * per_row);
    }

    proptest! {
        #[test]
        fn test_prop_inserts_keep_keys_strictly_ascending(
            keys in proptest::collection::vec(0u32..1_000, 0..64)
        ) {
            let mut series = store();
            for key in keys {
                let _ = series.insert_value(key, TickField::Close, key as f32);
            }
            let keys = series.keys();
            prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn test_prop_parallel_lengths_hold_under_mixed_edits(
            ops in proptest::collection::vec((0u32..100, proptest::bool::ANY), 0..128)
        ) {
            let mut series = store();
            for (key, is_remove) in ops {
                if is_remove {
                    series.remove(&key);
                } else {
                    let _ = series.insert_value(key, TickField::Close, 1.0);
                }
                let len = series.len();
                prop_assert_eq!(series.values(TickField::Close).unwrap().len(), len);
                prop_assert_eq!(series.values(TickField::AdjClose).unwrap().len(), len);
                prop_assert_eq!(series.qtys(TickField::Volume).unwrap().len(), len);
            }
        }

        #[test]
        fn test_prop_first_insert_wins_and_stays_retrievable(
            entries in proptest::collection::vec((0u32..500, -1_000.0f32..1_000.0), 1..64)
        ) {
            let mut series = store();
            let mut model = std::collections::HashMap::new();
            for (key, value) in entries {
                if series.insert_value(key, TickField::Close, value).is_ok() {
                    model.insert(key, value);
                }
            }
            for (key, value) in model {
                prop_assert_eq!(series.try_value(&key, TickField::Close), Some(value));
            }
        }
    }
}
