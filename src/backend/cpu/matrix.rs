//! Dense row-major matrix storage for the CPU backend

use std::fmt;

use crate::error::{Error, Result};

/// Dense, row-major `f64` matrix
///
/// Element `(i, j)` lives at `data[i * cols + j]`. Zero-sized shapes
/// (`n x 0`, `0 x m`) are valid and hold no data.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// `rows x cols` matrix with every element equal to `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// `rows x cols` matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Wrap row-major data
    ///
    /// Returns `InvalidArgument` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "expected {} elements for a {}x{} matrix, got {}",
                    rows * cols,
                    rows,
                    cols,
                    data.len()
                ),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major element slice
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix and return its row-major data
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Flat offset of `(i, j)`, checked against the shape
    #[inline]
    pub(crate) fn offset(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows || j >= self.cols {
            return Err(Error::index_out_of_bounds((i, j), self.shape()));
        }
        Ok(i * self.cols + j)
    }

    /// Row `i` as a slice
    #[inline]
    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 || self.cols == 0 {
            return write!(f, "[{}x{} matrix]", self.rows, self.cols);
        }
        for i in 0..self.rows {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>10.4}", v)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_length() {
        let m = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.row(1), &[3.0, 4.0]);

        let err = DenseMatrix::from_vec(2, 2, vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "data", .. }));
    }

    #[test]
    fn test_offset_bounds() {
        let m = DenseMatrix::zeros(2, 3);
        assert_eq!(m.offset(1, 2).unwrap(), 5);
        assert!(m.offset(2, 0).is_err());
        assert!(m.offset(0, 3).is_err());
    }

    #[test]
    fn test_display() {
        let m = DenseMatrix::from_vec(2, 2, vec![-0.60374, 0.28284, 2.537, -0.0841]).unwrap();
        assert_eq!(
            m.to_string(),
            "   -0.6037     0.2828\n    2.5370    -0.0841"
        );
        assert_eq!(DenseMatrix::zeros(3, 0).to_string(), "[3x0 matrix]");
    }
}
