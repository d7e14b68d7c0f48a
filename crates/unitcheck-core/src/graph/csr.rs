use thiserror::Error;

/// Compressed sparse rows: row `i` is `flat[offsets[i]..offsets[i + 1]]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrList<T> {
    offsets: Vec<u32>, // len = rows + 1
    flat: Vec<T>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CsrError {
    #[error("row {row} out of bounds for {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },
}

impl<T> Default for CsrList<T> {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            flat: Vec::new(),
        }
    }
}

impl<T> CsrList<T> {
    /// Build from one bucket per row; per-row order is kept as given.
    pub fn from_buckets(buckets: Vec<Vec<T>>) -> Self {
        let mut offsets = Vec::with_capacity(buckets.len() + 1);
        offsets.push(0);
        let mut total = 0u32;
        for bucket in &buckets {
            total += bucket.len() as u32;
            offsets.push(total);
        }

        let mut flat = Vec::with_capacity(total as usize);
        for bucket in buckets {
            flat.extend(bucket);
        }
        Self { offsets, flat }
    }

    pub fn rows(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of stored entries across all rows.
    pub fn nnz(&self) -> usize {
        self.flat.len()
    }

    pub fn row(&self, i: usize) -> Result<&[T], CsrError> {
        if i >= self.rows() {
            return Err(CsrError::RowOutOfBounds {
                row: i,
                rows: self.rows(),
            });
        }
        Ok(self.row_unchecked(i))
    }

    /// Panicking row accessor for indices already known to be valid.
    pub fn row_unchecked(&self, i: usize) -> &[T] {
        let a = self.offsets[i] as usize;
        let b = self.offsets[i + 1] as usize;
        &self.flat[a..b]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows()).map(|i| self.row_unchecked(i))
    }
}

impl<T: Ord> CsrList<T> {
    /// Same as [`CsrList::from_buckets`] but every row is sorted and deduplicated.
    pub fn from_buckets_sorted(mut buckets: Vec<Vec<T>>) -> Self {
        for bucket in &mut buckets {
            bucket.sort_unstable();
            bucket.dedup();
        }
        Self::from_buckets(buckets)
    }
}
