//! All-pairs Newtonian gravity for the n-body engine
//!
//! Defines the vectorized [`AccelerationField`] used by every integrator,
//! and the naive double-loop [`naive_accelerations`] it is checked against.
//!
//! The field materializes the full N x N pair tensor on every evaluation,
//! so memory and time are both O(N^2). That is fine for tens to a few hundred
//! bodies and is the scaling limit of this crate.

use std::ops::{Index, IndexMut};

use nalgebra::{DMatrix, DVector};

use crate::simulation::states::{pair_acceleration, NVec3, StateMatrix};

/// Dense N x N table of 3d vectors, row-major: entry (i, j) is about the
/// pair "body j acting on body i".
#[derive(Debug, Clone, Default)]
pub struct PairTensor {
    n: usize,
    data: Vec<NVec3>,
}

impl PairTensor {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![NVec3::zeros(); n * n],
        }
    }

    /// Number of bodies along each axis.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Entries (i, 0..n), the pairs acting on body i.
    pub fn row(&self, i: usize) -> &[NVec3] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

impl Index<(usize, usize)> for PairTensor {
    type Output = NVec3;

    fn index(&self, (i, j): (usize, usize)) -> &NVec3 {
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for PairTensor {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut NVec3 {
        &mut self.data[i * self.n + j]
    }
}

/// Set the self-pair squared distances to +inf.
///
/// A body's distance to itself is 0, which would make its self-attraction
/// GM / 0. With r2 = inf on the diagonal the self term becomes
/// (0 / inf) * (GM / inf) = 0 exactly. Only the diagonal is touched: two
/// distinct bodies at the same position still blow up to inf / NaN.
pub fn apply_self_interaction_mask(r2: &mut DMatrix<f64>) {
    r2.fill_diagonal(f64::INFINITY);
}

/// Vectorized gravitational acceleration on every body due to every other.
///
/// Holds the pair tensor and squared-distance scratch between calls so that
/// stepping at high rates does not reallocate O(N^2) memory each time. The
/// buffers are resized whenever a different N is evaluated.
#[derive(Debug, Clone)]
pub struct AccelerationField {
    pairs: PairTensor, // displacements, then per-pair contributions
    r2: DMatrix<f64>, // squared pair distances, masked diagonal
}

impl AccelerationField {
    pub fn new(n: usize) -> Self {
        Self {
            pairs: PairTensor::zeros(n),
            r2: DMatrix::zeros(n, n),
        }
    }

    /// Evaluate the field and return a freshly allocated N x 3 matrix.
    pub fn evaluate(&mut self, positions: &StateMatrix, gm: &DVector<f64>) -> StateMatrix {
        let mut out = StateMatrix::zeros(positions.nrows());
        self.evaluate_into(positions, gm, &mut out);
        out
    }

    /// Evaluate the field into `out` (row i = acceleration of body i, km/s^2).
    ///
    /// # Panics
    /// If `positions`, `gm` and `out` do not all describe the same number of
    /// bodies.
    pub fn evaluate_into(
        &mut self,
        positions: &StateMatrix,
        gm: &DVector<f64>,
        out: &mut StateMatrix,
    ) {
        let n = positions.nrows();
        assert_eq!(
            n,
            gm.len(),
            "positions has {} rows but {} gravitational parameters were given",
            n,
            gm.len()
        );
        assert_eq!(out.nrows(), n, "output matrix must have one row per body");

        if self.pairs.dim() != n {
            *self = Self::new(n);
        }

        // D[i][j] = x_j - x_i and r2[i][j] = |D[i][j]|^2
        for i in 0..n {
            let xi: NVec3 = positions.row(i).transpose();
            for j in 0..n {
                let d = positions.row(j).transpose() - xi;
                self.r2[(i, j)] = d.norm_squared();
                self.pairs[(i, j)] = d;
            }
        }

        apply_self_interaction_mask(&mut self.r2);

        // contribution[i][j] = gm[j] / r2 * D / |D|, summed over j.
        // Rows are independent; the mask above is already in place.
        for i in 0..n {
            let mut acc = NVec3::zeros();
            for j in 0..n {
                let r2 = self.r2[(i, j)];
                let direction = self.pairs[(i, j)] / r2.sqrt();
                let contribution = direction * (gm[j] / r2);
                self.pairs[(i, j)] = contribution;
                acc += contribution;
            }
            out.set_row(i, &acc.transpose());
        }
    }

    /// Per-pair contributions from the most recent evaluation: entry (i, j)
    /// is the acceleration of body i due to body j.
    pub fn contributions(&self) -> &PairTensor {
        &self.pairs
    }

    /// Squared pair distances from the most recent evaluation, with the
    /// self-interaction mask applied.
    pub fn squared_distances(&self) -> &DMatrix<f64> {
        &self.r2
    }
}

/// One-shot vectorized evaluation with throwaway buffers.
pub fn accelerations(positions: &StateMatrix, gm: &DVector<f64>) -> StateMatrix {
    AccelerationField::new(positions.nrows()).evaluate(positions, gm)
}

/// Reference O(N^2) double loop, skipping j == i explicitly.
///
/// Only meant to double-check [`AccelerationField`]; it is noticeably slower.
pub fn naive_accelerations(positions: &StateMatrix, gm: &DVector<f64>) -> StateMatrix {
    let n = positions.nrows();
    assert_eq!(
        n,
        gm.len(),
        "positions has {} rows but {} gravitational parameters were given",
        n,
        gm.len()
    );

    let mut out = StateMatrix::zeros(n);
    for i in 0..n {
        let xi: NVec3 = positions.row(i).transpose();
        let mut acc = NVec3::zeros();
        for j in 0..n {
            if i == j {
                continue;
            }
            let xj: NVec3 = positions.row(j).transpose();
            acc += pair_acceleration(&xi, &xj, gm[j]);
        }
        out.set_row(i, &acc.transpose());
    }
    out
}
