use crate::sparse::{CsrMatrix, SparseRow};
use crate::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Below this many fitted rows distances are computed on the calling thread
const PARALLEL_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    Cosine,
    Euclidean,
}

/// One neighbor returned by [`NeighborIndex::kneighbors`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

impl Neighbor {
    /// `1 - distance`, the score reported to clients
    #[inline]
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }

    #[inline]
    fn order(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.row.cmp(&other.row))
    }
}

/// On-disk form of the index: the metric plus the fitted rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedIndex {
    pub distance: Distance,
    pub fitted: CsrMatrix,
}

/// Exact k-nearest-neighbor index over fitted sparse rows
///
/// Every query scans all fitted rows. Results are ordered by increasing
/// distance with ties broken by ascending row position, so a query is fully
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FittedIndex", into = "FittedIndex")]
pub struct NeighborIndex {
    distance: Distance,
    fitted: CsrMatrix,
    norms: Vec<f32>,
}

impl TryFrom<FittedIndex> for NeighborIndex {
    type Error = Error;

    fn try_from(parts: FittedIndex) -> Result<Self> {
        Self::new(parts.distance, parts.fitted)
    }
}

impl From<NeighborIndex> for FittedIndex {
    fn from(index: NeighborIndex) -> Self {
        FittedIndex {
            distance: index.distance,
            fitted: index.fitted,
        }
    }
}

impl NeighborIndex {
    pub fn new(distance: Distance, fitted: CsrMatrix) -> Result<Self> {
        fitted.validate()?;
        let norms = fitted.rows().map(|row| row.norm()).collect();
        Ok(Self {
            distance,
            fitted,
            norms,
        })
    }

    #[inline]
    pub fn distance(&self) -> Distance {
        self.distance
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fitted.n_rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.fitted.n_cols()
    }

    fn distance_to(&self, query: &SparseRow<'_>, query_norm: f32, row: usize) -> f32 {
        let Some(fitted) = self.fitted.row(row) else {
            return f32::INFINITY;
        };
        match self.distance {
            Distance::Cosine => {
                let norm = self.norms[row];
                if query_norm == 0.0 || norm == 0.0 {
                    return 1.0;
                }
                (1.0 - query.dot(&fitted) / (query_norm * norm)).clamp(0.0, 2.0)
            }
            Distance::Euclidean => query.squared_l2_distance(&fitted).sqrt(),
        }
    }

    /// Find the `k` fitted rows closest to `query`.
    ///
    /// Returns fewer than `k` neighbors only when the index holds fewer rows.
    pub fn kneighbors(&self, query: &SparseRow<'_>, k: usize) -> Vec<Neighbor> {
        let k = k.min(self.len());
        if k == 0 {
            return Vec::new();
        }

        let query_norm = query.norm();
        let score = |row: usize| Neighbor {
            row,
            distance: self.distance_to(query, query_norm, row),
        };
        let mut candidates: Vec<Neighbor> = if self.len() >= PARALLEL_THRESHOLD {
            (0..self.len()).into_par_iter().map(score).collect()
        } else {
            (0..self.len()).map(score).collect()
        };

        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, Neighbor::order);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(Neighbor::order);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(distance: Distance) -> NeighborIndex {
        let fitted = CsrMatrix::from_rows(
            3,
            &[
                vec![(0, 1.0)],
                vec![(0, 1.0), (1, 1.0)],
                vec![(1, 1.0)],
                vec![(2, 1.0)],
                vec![(0, 2.0)],
            ],
        )
        .unwrap();
        NeighborIndex::new(distance, fitted).unwrap()
    }

    #[test]
    fn test_cosine_kneighbors_order() {
        let idx = index(Distance::Cosine);
        let query = CsrMatrix::from_rows(3, &[vec![(0, 1.0)]]).unwrap();
        let result = idx.kneighbors(&query.row(0).unwrap(), 3);

        assert_eq!(result.len(), 3);
        // rows 0 and 4 are parallel to the query; the tie keeps row order
        assert_eq!(result[0].row, 0);
        assert_eq!(result[1].row, 4);
        assert_eq!(result[2].row, 1);
        assert_eq!(result[0].distance, 0.0);
        assert!((result[2].distance - (1.0 - 1.0 / 2f32.sqrt())).abs() < 1e-6);
        assert!(result.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_euclidean_kneighbors() {
        let idx = index(Distance::Euclidean);
        let query = CsrMatrix::from_rows(3, &[vec![(0, 2.0)]]).unwrap();
        let result = idx.kneighbors(&query.row(0).unwrap(), 2);
        assert_eq!(result[0].row, 4);
        assert_eq!(result[0].distance, 0.0);
        assert_eq!(result[1].row, 0);
        assert!((result[1].distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_k_larger_than_index() {
        let idx = index(Distance::Cosine);
        let query = CsrMatrix::from_rows(3, &[vec![(2, 1.0)]]).unwrap();
        let result = idx.kneighbors(&query.row(0).unwrap(), 50);
        assert_eq!(result.len(), 5);
        assert_eq!(result[0].row, 3);
        assert!(idx.kneighbors(&query.row(0).unwrap(), 0).is_empty());
    }

    #[test]
    fn test_zero_vector_query() {
        let idx = index(Distance::Cosine);
        let query = CsrMatrix::from_rows(3, &[vec![]]).unwrap();
        let result = idx.kneighbors(&query.row(0).unwrap(), 5);
        assert!(result.iter().all(|n| n.distance == 1.0));
        let rows: Vec<usize> = result.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_similarity_is_one_minus_distance() {
        let n = Neighbor { row: 0, distance: 0.25 };
        assert_eq!(n.similarity(), 0.75);
        let far = Neighbor { row: 1, distance: 3.0 };
        assert_eq!(far.similarity(), -2.0);
    }

    #[test]
    fn test_serde_roundtrip_recomputes_norms() {
        let idx = index(Distance::Cosine);
        let bytes = bincode::serialize(&idx).unwrap();
        let restored: NeighborIndex = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.len(), 5);
        assert_eq!(restored.distance(), Distance::Cosine);
        assert_eq!(restored.norms, idx.norms);
    }
}
