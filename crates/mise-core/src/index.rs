//! Nearest-neighbor index over normalized feature rows
//!
//! An exhaustive scan: every query visits every row once (O(n)) and keeps the
//! k best candidates in a bounded max-heap. Candidates are ordered by
//! `(distance, row)`, so equal distances resolve to the earlier table row
//! and results are deterministic.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::matrix::FeatureMatrix;

/// Distance between a query and an indexed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    /// Distance over the columns the query sets; unset columns are skipped
    ///
    /// Euclidean distance is scaled by the largest difference so that
    /// squaring cannot overflow for finite inputs.
    pub fn distance(&self, row: ArrayView1<'_, f64>, query: &[Option<f64>]) -> f64 {
        let diffs = || {
            row.iter()
                .zip(query)
                .filter_map(|(&value, target)| target.map(|t| (value - t).abs()))
        };

        match self {
            DistanceMetric::Euclidean => {
                let largest = diffs().fold(0.0, f64::max);
                if largest == 0.0 || !largest.is_finite() {
                    return largest;
                }
                largest * diffs().map(|d| (d / largest).powi(2)).sum::<f64>().sqrt()
            }
            DistanceMetric::Manhattan => diffs().sum(),
        }
    }
}

/// One search hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Row in the indexed table
    pub row: usize,
    pub distance: f64,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.row.cmp(&other.row))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Exhaustive nearest-neighbor index
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    points: FeatureMatrix,
    metric: DistanceMetric,
}

impl NeighborIndex {
    /// Index already-normalized points
    pub fn build(points: FeatureMatrix, metric: DistanceMetric) -> Self {
        Self { points, metric }
    }

    pub fn points(&self) -> &FeatureMatrix {
        &self.points
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the `k` nearest rows, ascending by distance then row
    ///
    /// `query` holds one optional target per column.
    pub fn nearest(&self, query: &[Option<f64>], k: usize) -> Vec<Neighbor> {
        debug_assert_eq!(query.len(), self.points.ncols());
        if k == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
        for row in 0..self.points.nrows() {
            let candidate = Neighbor {
                row,
                distance: self.metric.distance(self.points.row(row), query),
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn index(rows: &[Vec<f64>], metric: DistanceMetric) -> NeighborIndex {
        let points =
            FeatureMatrix::from_rows(vec!["x".to_string(), "y".to_string()], rows).unwrap();
        NeighborIndex::build(points, metric)
    }

    #[test]
    fn test_euclidean_distance() {
        let row = array![3.0, 4.0];
        let d = DistanceMetric::Euclidean.distance(row.view(), &[Some(0.0), Some(0.0)]);
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_manhattan_distance() {
        let row = array![3.0, -4.0];
        let d = DistanceMetric::Manhattan.distance(row.view(), &[Some(0.0), Some(0.0)]);
        assert_eq!(d, 7.0);
    }

    #[test]
    fn test_unset_columns_ignored() {
        let row = array![3.0, 400.0];
        let d = DistanceMetric::Euclidean.distance(row.view(), &[Some(1.0), None]);
        assert_eq!(d, 2.0);
    }

    #[test]
    fn test_euclidean_large_differences_stay_finite() {
        let row = array![0.0, 0.0];
        let d = DistanceMetric::Euclidean.distance(row.view(), &[Some(3e200), Some(4e200)]);
        assert!(d.is_finite());
        assert!((d - 5e200).abs() / 5e200 < 1e-15);
    }

    #[test]
    fn test_far_query_still_ranks_rows() {
        let idx = index(&[vec![0.0, 0.0], vec![1e150, 0.0]], DistanceMetric::Euclidean);
        let results = idx.nearest(&[Some(1e160), Some(0.0)], 1);
        assert_eq!(results[0].row, 1);
        assert!(results[0].distance.is_finite());
    }

    #[test]
    fn test_nearest_sorted() {
        let idx = index(
            &[vec![0.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0], vec![10.0, 0.0]],
            DistanceMetric::Euclidean,
        );

        let results = idx.nearest(&[Some(0.4), Some(0.0)], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].row, 0);
        assert_eq!(results[1].row, 1);
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_ties_resolve_to_earlier_rows() {
        let idx = index(
            &[vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0], vec![0.0, -1.0]],
            DistanceMetric::Euclidean,
        );

        let rows: Vec<usize> = idx
            .nearest(&[Some(0.0), Some(0.0)], 3)
            .iter()
            .map(|n| n.row)
            .collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_len() {
        let idx = index(&[vec![0.0, 0.0], vec![1.0, 1.0]], DistanceMetric::Euclidean);
        assert_eq!(idx.nearest(&[Some(0.0), Some(0.0)], 5).len(), 2);
        assert!(idx.nearest(&[Some(0.0), Some(0.0)], 0).is_empty());
    }

    #[test]
    fn test_empty_index() {
        let idx = index(&[], DistanceMetric::Manhattan);
        assert!(idx.is_empty());
        assert!(idx.nearest(&[Some(0.0), Some(0.0)], 3).is_empty());
    }
}
