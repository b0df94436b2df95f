//! Sparse assembly, bandwidth reduction and banded SPD solves
//!
//! Frame stiffness matrices are mostly zeros with the non-zeros clustered
//! around the diagonal once equations are numbered sensibly. Assembly goes
//! through COO triplets, equations are ordered with Reverse Cuthill-McKee and
//! the reduced system is factored in skyline (variable band) storage.

use std::collections::VecDeque;

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Pivots at or below this fraction of the original diagonal count as zero
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Sparse matrix builder using COO format
/// More efficient for incremental assembly
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // Two 3-DOF nodes per element, a handful of elements per node
        let estimated_nnz = size * 18;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter an element matrix into the global matrix.
    ///
    /// `dofs[k]` is the global equation for local DOF `k`, or `None` when
    /// that DOF is restrained and has no equation.
    pub fn add_element_matrix<const N: usize>(
        &mut self,
        dofs: &[Option<usize>; N],
        k_elem: &nalgebra::SMatrix<f64, N, N>,
    ) {
        for (a, row) in dofs.iter().enumerate() {
            let Some(row) = *row else { continue };
            for (b, col) in dofs.iter().enumerate() {
                if let Some(col) = *col {
                    self.add(row, col, k_elem[(a, b)]);
                }
            }
        }
    }

    /// Convert to CSR format; duplicate entries are summed
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Convert to dense matrix
    pub fn to_dense(&self) -> nalgebra::DMatrix<f64> {
        let mut mat = nalgebra::DMatrix::zeros(self.size, self.size);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored triplets (before duplicates are summed)
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// A Cholesky pivot that was zero, negative or not a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotBreakdown {
    pub equation: usize,
    pub pivot: f64,
}

/// Skyline Cholesky solver for symmetric positive definite matrices
///
/// Row `i` stores the lower triangle from its first non-zero column up to the
/// diagonal, so fill-in stays inside the profile.
#[derive(Debug, Clone)]
pub struct SkylineCholesky {
    size: usize,
    rows: Vec<Vec<f64>>,
    first: Vec<usize>,
    factored: bool,
}

impl SkylineCholesky {
    /// Build skyline storage from the lower triangle of a symmetric CSR matrix
    pub fn new(csr: &CsrMatrix<f64>) -> Self {
        let size = csr.nrows();

        let mut first: Vec<usize> = (0..size).collect();
        for (row, col, _) in csr.triplet_iter() {
            if col < first[row] {
                first[row] = col;
            }
        }

        let mut rows: Vec<Vec<f64>> = (0..size).map(|i| vec![0.0; i - first[i] + 1]).collect();
        for (row, col, &val) in csr.triplet_iter() {
            if col <= row {
                rows[row][col - first[row]] += val;
            }
        }

        Self {
            size,
            rows,
            first,
            factored: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored lower-triangle entries including the diagonal
    pub fn profile(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Largest distance from the diagonal to the first stored column
    pub fn half_bandwidth(&self) -> usize {
        (0..self.size).map(|i| i - self.first[i]).max().unwrap_or(0)
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        if col < self.first[row] {
            0.0
        } else {
            self.rows[row][col - self.first[row]]
        }
    }

    /// Factorize in place, K = L * L^T
    pub fn factorize(&mut self) -> Result<(), PivotBreakdown> {
        for i in 0..self.size {
            let start_i = self.first[i];
            let original_diag = self.rows[i][i - start_i];

            for j in start_i..i {
                let start = start_i.max(self.first[j]);
                let mut sum = 0.0;
                for k in start..j {
                    sum += self.at(i, k) * self.at(j, k);
                }

                let diag_j = self.at(j, j);
                let idx = j - start_i;
                self.rows[i][idx] = (self.rows[i][idx] - sum) / diag_j;
            }

            let mut sum = 0.0;
            for k in start_i..i {
                let val = self.rows[i][k - start_i];
                sum += val * val;
            }

            let pivot = original_diag - sum;
            if !(pivot > PIVOT_TOLERANCE * original_diag.abs()) {
                return Err(PivotBreakdown { equation: i, pivot });
            }
            self.rows[i][i - start_i] = pivot.sqrt();
        }

        self.factored = true;
        Ok(())
    }

    /// Solve L * L^T * x = b with a factorized matrix
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        debug_assert!(self.factored, "solve() called before factorize()");
        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..self.size {
            let mut sum = 0.0;
            for j in self.first[i]..i {
                sum += self.at(i, j) * x[j];
            }
            x[i] = (x[i] - sum) / self.at(i, i);
        }

        // Backward substitution: L^T * x = y
        for i in (0..self.size).rev() {
            x[i] /= self.at(i, i);
            for j in self.first[i]..i {
                x[j] -= self.at(i, j) * x[i];
            }
        }

        x
    }
}

/// Bandwidth reduction using Reverse Cuthill-McKee algorithm
///
/// `adjacency[i]` lists the neighbours of vertex `i`. Returns the vertices in
/// their new order: `order[k]` is the vertex numbered `k`.
pub fn reverse_cuthill_mckee(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    if n == 0 {
        return vec![];
    }

    let degrees: Vec<usize> = adjacency.iter().map(Vec::len).collect();

    // Visit neighbours by increasing degree, ties by index
    let mut adj: Vec<Vec<usize>> = adjacency.to_vec();
    for neighbors in &mut adj {
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors.sort_by_key(|&v| degrees[v]);
    }

    let mut visited = vec![false; n];
    let mut result = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    while result.len() < n {
        // Each component starts from its lowest degree vertex
        let start = (0..n)
            .filter(|&v| !visited[v])
            .min_by_key(|&v| degrees[v])
            .unwrap_or(0);

        queue.push_back(start);
        visited[start] = true;

        while let Some(vertex) = queue.pop_front() {
            result.push(vertex);
            for &neighbor in &adj[vertex] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    result.reverse();
    result
}

/// Create inverse permutation
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (new_idx, &old_idx) in perm.iter().enumerate() {
        inv[old_idx] = new_idx;
    }
    inv
}
