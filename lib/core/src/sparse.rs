use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Borrowed view of one row of a [`CsrMatrix`]
///
/// Column indices are strictly increasing, which lets the pairwise
/// operations below walk both rows in a single merge pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseRow<'a> {
    indices: &'a [u32],
    values: &'a [f32],
}

impl<'a> SparseRow<'a> {
    #[inline]
    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    #[inline]
    pub fn values(&self) -> &'a [f32] {
        self.values
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dot product against another sparse row
    pub fn dot(&self, other: &SparseRow<'_>) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// L2 norm
    #[inline]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Squared Euclidean distance, computed element-wise so it never goes negative
    pub fn squared_l2_distance(&self, other: &SparseRow<'_>) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() || j < other.indices.len() {
            let left = self.indices.get(i);
            let right = other.indices.get(j);
            let diff = match (left, right) {
                (Some(a), Some(b)) if a == b => {
                    let d = self.values[i] - other.values[j];
                    i += 1;
                    j += 1;
                    d
                }
                (Some(a), Some(b)) if a < b => {
                    i += 1;
                    self.values[i - 1]
                }
                (Some(_), None) => {
                    i += 1;
                    self.values[i - 1]
                }
                _ => {
                    j += 1;
                    other.values[j - 1]
                }
            };
            sum += diff * diff;
        }
        sum
    }
}

/// Compressed sparse row matrix, one row per catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsrMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f32>,
}

impl CsrMatrix {
    /// Build a matrix from raw CSR buffers, rejecting malformed input
    pub fn new(
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<u32>,
        data: Vec<f32>,
    ) -> Result<Self> {
        let matrix = Self {
            n_cols,
            indptr,
            indices,
            data,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Build a matrix from per-row `(column, value)` entries.
    ///
    /// Entries within a row may come in any order; duplicate columns are rejected.
    pub fn from_rows(n_cols: usize, rows: &[Vec<(u32, f32)>]) -> Result<Self> {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for row in rows {
            let mut entries = row.clone();
            entries.sort_by_key(|(col, _)| *col);
            for (col, value) in entries {
                indices.push(col);
                data.push(value);
            }
            indptr.push(indices.len());
        }

        Self::new(n_cols, indptr, indices, data)
    }

    /// Check the CSR invariants. Deserialized matrices must pass this before use.
    pub fn validate(&self) -> Result<()> {
        let Some((&first, _)) = self.indptr.split_first() else {
            return Err(Error::MalformedMatrix("indptr is empty".to_string()));
        };
        if first != 0 {
            return Err(Error::MalformedMatrix(format!("indptr starts at {first}, expected 0")));
        }
        if self.indices.len() != self.data.len() {
            return Err(Error::MalformedMatrix(format!(
                "{} column indices but {} values",
                self.indices.len(),
                self.data.len()
            )));
        }
        let last = self.indptr[self.indptr.len() - 1];
        if last != self.indices.len() {
            return Err(Error::MalformedMatrix(format!(
                "indptr ends at {last} but there are {} entries",
                self.indices.len()
            )));
        }

        for (row, window) in self.indptr.windows(2).enumerate() {
            let (start, end) = (window[0], window[1]);
            if start > end || end > self.indices.len() {
                return Err(Error::MalformedMatrix(format!("indptr is not monotonic at row {row}")));
            }
            let cols = &self.indices[start..end];
            if let Some(&col) = cols.iter().find(|&&c| c as usize >= self.n_cols) {
                return Err(Error::MalformedMatrix(format!(
                    "row {row} references column {col} but matrix has {} columns",
                    self.n_cols
                )));
            }
            if cols.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(Error::MalformedMatrix(format!(
                    "row {row} column indices are not strictly increasing"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Borrow row `idx`, or `None` when out of range
    #[inline]
    pub fn row(&self, idx: usize) -> Option<SparseRow<'_>> {
        let start = *self.indptr.get(idx)?;
        let end = *self.indptr.get(idx + 1)?;
        Some(SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        })
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = SparseRow<'_>> + '_ {
        self.indptr.windows(2).map(move |w| SparseRow {
            indices: &self.indices[w[0]..w[1]],
            values: &self.data[w[0]..w[1]],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix {
        CsrMatrix::from_rows(
            4,
            &[
                vec![(0, 1.0), (2, 2.0)],
                vec![(3, 1.0), (1, 3.0)],
                vec![],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_and_shape() {
        let m = sample();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 4);
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.row(1).unwrap().indices(), &[1, 3]);
        assert_eq!(m.row(1).unwrap().values(), &[3.0, 1.0]);
        assert!(m.row(2).unwrap().is_empty());
        assert!(m.row(3).is_none());
        assert_eq!(m.rows().len(), 3);
    }

    #[test]
    fn test_dot_and_norm() {
        let rows = [vec![(0, 1.0), (1, 2.0)], vec![(1, 3.0), (2, 4.0)]];
        let m = CsrMatrix::from_rows(3, &rows).unwrap();
        let a = m.row(0).unwrap();
        let b = m.row(1).unwrap();
        assert!((a.dot(&b) - 6.0).abs() < 1e-6);
        assert!((b.norm() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_squared_l2_distance() {
        let m = CsrMatrix::from_rows(3, &[vec![(0, 3.0)], vec![(2, 4.0)], vec![(0, 3.0)]]).unwrap();
        let a = m.row(0).unwrap();
        let b = m.row(1).unwrap();
        assert!((a.squared_l2_distance(&b) - 25.0).abs() < 1e-6);
        assert!((b.squared_l2_distance(&a) - 25.0).abs() < 1e-6);
        assert_eq!(a.squared_l2_distance(&m.row(2).unwrap()), 0.0);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            CsrMatrix::new(2, vec![], vec![], vec![]),
            Err(Error::MalformedMatrix(_))
        ));
        assert!(CsrMatrix::new(2, vec![0, 1], vec![5], vec![1.0]).is_err());
        assert!(CsrMatrix::new(2, vec![0, 2], vec![1, 0], vec![1.0, 1.0]).is_err());
        assert!(CsrMatrix::new(2, vec![0, 1], vec![0], vec![]).is_err());
        assert!(CsrMatrix::new(2, vec![0, 2, 1], vec![0, 1], vec![1.0, 1.0]).is_err());
        assert!(CsrMatrix::from_rows(2, &[vec![(1, 1.0), (1, 2.0)]]).is_err());
        assert!(CsrMatrix::new(2, vec![0], vec![], vec![]).is_ok());
    }
}
