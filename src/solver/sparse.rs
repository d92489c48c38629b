//! Compressed sparse storage for the system matrices
//!
//! The Crank-Nicolson matrices carry at most three entries per row, so they
//! are assembled through a [`TripletBuilder`] and compressed into one of two
//! layouts:
//!
//! - **CSC** (compressed sparse column): `indptr` runs over columns,
//!   `indices` hold row numbers. Default, column access is what the
//!   factorization reads.
//! - **CSR** (compressed sparse row): `indptr` runs over rows, `indices`
//!   hold column numbers. Row-oriented products are a single pass.
//!
//! The choice is a representation detail with no effect on results.
//!
//! # Example
//!
//! ```rust
//! use drying_rs::solver::{SparseFormat, TripletBuilder};
//! use nalgebra::DVector;
//!
//! let mut builder = TripletBuilder::new(2, 2);
//! builder.set(0, 0, 2.0);
//! builder.set(1, 0, -1.0);
//! builder.set(1, 1, 2.0);
//!
//! let matrix = builder.build(SparseFormat::Csr);
//! let y = matrix.mul_vec(&DVector::from_vec(vec![1.0, 1.0]));
//! assert_eq!(y.as_slice(), &[2.0, 1.0]);
//! ```

use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;
use std::fmt;

// =================================================================================================
// Storage format
// =================================================================================================

/// Compressed storage layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SparseFormat {
    /// Compressed sparse column
    #[default]
    Csc,
    /// Compressed sparse row
    Csr,
}

impl SparseFormat {
    /// Short lowercase name ("csc" / "csr")
    pub fn name(&self) -> &'static str {
        match self {
            SparseFormat::Csc => "csc",
            SparseFormat::Csr => "csr",
        }
    }
}

impl fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Builder
// =================================================================================================

/// Coordinate-format assembler
///
/// Entries are kept sorted by `(row, col)`. Setting the same position twice
/// overwrites the previous value.
#[derive(Debug, Clone)]
pub struct TripletBuilder {
    rows: usize,
    cols: usize,
    entries: BTreeMap<(usize, usize), f64>,
}

impl TripletBuilder {
    /// Create an empty `rows × cols` builder
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: BTreeMap::new(),
        }
    }

    /// Create an empty `n × n` builder
    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Set the value at `(row, col)` (overwrite)
    ///
    /// # Panics
    ///
    /// Panics when the position lies outside the matrix. Positions are
    /// computed by stencil code, never taken from user input.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.rows && col < self.cols,
            "entry ({row}, {col}) outside a {}x{} matrix",
            self.rows,
            self.cols
        );
        self.entries.insert((row, col), value);
    }

    /// Write a contiguous stencil `values` into `row`, starting at `first_col`
    pub fn set_row_stencil(&mut self, row: usize, first_col: usize, values: &[f64]) {
        for (offset, &value) in values.iter().enumerate() {
            self.set(row, first_col + offset, value);
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Compress into the requested layout (consumes the builder)
    pub fn build(self, format: SparseFormat) -> SparseMatrix {
        let major_len = match format {
            SparseFormat::Csr => self.rows,
            SparseFormat::Csc => self.cols,
        };

        let mut sorted: Vec<(usize, usize, f64)> = self
            .entries
            .iter()
            .map(|(&(row, col), &value)| match format {
                SparseFormat::Csr => (row, col, value),
                SparseFormat::Csc => (col, row, value),
            })
            .collect();
        sorted.sort_by_key(|&(major, minor, _)| (major, minor));

        let mut indptr = vec![0usize; major_len + 1];
        for &(major, _, _) in &sorted {
            indptr[major + 1] += 1;
        }
        for i in 0..major_len {
            indptr[i + 1] += indptr[i];
        }

        let indices = sorted.iter().map(|&(_, minor, _)| minor).collect();
        let values = sorted.iter().map(|&(_, _, value)| value).collect();

        SparseMatrix {
            format,
            rows: self.rows,
            cols: self.cols,
            indptr,
            indices,
            values,
        }
    }
}

// =================================================================================================
// Compressed matrix
// =================================================================================================

/// Compressed sparse matrix in CSC or CSR layout
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    format: SparseFormat,
    rows: usize,
    cols: usize,
    /// Offsets into `indices`/`values`, one per major index plus one
    indptr: Vec<usize>,
    /// Minor index of every stored entry
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseMatrix {
    /// Storage layout
    pub fn format(&self) -> SparseFormat {
        self.format
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Value at `(row, col)`, zero when not stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let (major, minor) = match self.format {
            SparseFormat::Csr => (row, col),
            SparseFormat::Csc => (col, row),
        };
        let start = self.indptr[major];
        let end = self.indptr[major + 1];

        // Minor indices are sorted within each major slice
        match self.indices[start..end].binary_search(&minor) {
            Ok(local) => self.values[start + local],
            Err(_) => 0.0,
        }
    }

    /// Iterate over stored entries as `(row, col, value)`, in storage order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let format = self.format;
        (0..self.indptr.len() - 1).flat_map(move |major| {
            (self.indptr[major]..self.indptr[major + 1]).map(move |k| {
                let minor = self.indices[k];
                match format {
                    SparseFormat::Csr => (major, minor, self.values[k]),
                    SparseFormat::Csc => (minor, major, self.values[k]),
                }
            })
        })
    }

    /// Stored entries of one row as `(col, value)`, sorted by column
    pub fn row_entries(&self, row: usize) -> Vec<(usize, f64)> {
        match self.format {
            SparseFormat::Csr => (self.indptr[row]..self.indptr[row + 1])
                .map(|k| (self.indices[k], self.values[k]))
                .collect(),
            SparseFormat::Csc => (0..self.cols)
                .filter_map(|col| {
                    let start = self.indptr[col];
                    let end = self.indptr[col + 1];
                    self.indices[start..end]
                        .binary_search(&row)
                        .ok()
                        .map(|local| (col, self.values[start + local]))
                })
                .collect(),
        }
    }

    /// `true` when every stored value of `row` is zero (or nothing is stored)
    pub fn row_is_zero(&self, row: usize) -> bool {
        self.row_entries(row).iter().all(|&(_, value)| value == 0.0)
    }

    /// Lower and upper bandwidth `(kl, ku)` of the stored pattern
    pub fn bandwidth(&self) -> (usize, usize) {
        self.triplets()
            .filter(|&(_, _, value)| value != 0.0)
            .fold((0, 0), |(kl, ku), (row, col, _)| {
                if row > col {
                    (kl.max(row - col), ku)
                } else {
                    (kl, ku.max(col - row))
                }
            })
    }

    /// Matrix-vector product `y = A·x`
    ///
    /// # Panics
    ///
    /// Panics when `x.len() != ncols()`.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(x.len(), self.cols, "vector length must match the column count");

        let mut y = DVector::zeros(self.rows);
        match self.format {
            SparseFormat::Csr => {
                for row in 0..self.rows {
                    let mut sum = 0.0;
                    for k in self.indptr[row]..self.indptr[row + 1] {
                        sum += self.values[k] * x[self.indices[k]];
                    }
                    y[row] = sum;
                }
            }
            SparseFormat::Csc => {
                for col in 0..self.cols {
                    let xj = x[col];
                    for k in self.indptr[col]..self.indptr[col + 1] {
                        y[self.indices[k]] += self.values[k] * xj;
                    }
                }
            }
        }
        y
    }

    /// Dense copy of the matrix
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.rows, self.cols);
        for (row, col, value) in self.triplets() {
            dense[(row, col)] = value;
        }
        dense
    }

    /// Same matrix in another layout
    pub fn to_format(&self, format: SparseFormat) -> SparseMatrix {
        if format == self.format {
            return self.clone();
        }
        let mut builder = TripletBuilder::new(self.rows, self.cols);
        for (row, col, value) in self.triplets() {
            builder.set(row, col, value);
        }
        builder.build(format)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
