//! Square matrices of 64-bit words under wrapping arithmetic.
//!
//! The key schedule works in the ring of integers mod 2^64; transpose, sum,
//! difference and product are all plain two-loop operations with wrap-around
//! as the defined behavior. On integer matrices the original formulation's
//! adjoint is just the transpose.

use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// MATRIX
// =============================================================================

/// A dense `n x n` matrix of `u64`, row-major.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct QuadWordMatrix {
    side: usize,
    data: Vec<u64>,
}

impl QuadWordMatrix {
    /// All-zero matrix of side `side`.
    pub(crate) fn zeros(side: usize) -> Self {
        Self {
            side,
            data: vec![0u64; side * side],
        }
    }

    pub(crate) const fn side(&self) -> usize {
        self.side
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> u64 {
        self.data[row * self.side + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u64) {
        self.data[row * self.side + col] = value;
    }

    /// Element at flat column-major index `i`, i.e. `(i % side, i / side)`.
    ///
    /// The key schedule's whitening walk addresses the accumulator in this
    /// order; the backing storage itself stays row-major.
    pub(crate) fn get_column_major(&self, index: usize) -> u64 {
        self.get(index % self.side, index / self.side)
    }

    /// Row-major view of all elements.
    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Reset every element to zero without reallocating.
    pub(crate) fn clear(&mut self) {
        self.data.zeroize();
    }

    pub(crate) fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.side);
        for row in 0..self.side {
            for col in 0..self.side {
                out.set(col, row, self.get(row, col));
            }
        }
        out
    }

    /// Element-wise wrapping sum.
    pub(crate) fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.side, other.side);
        let mut out = Self::zeros(self.side);
        for (dst, (&a, &b)) in out.data.iter_mut().zip(self.data.iter().zip(&other.data)) {
            *dst = a.wrapping_add(b);
        }
        out
    }

    /// Element-wise wrapping difference.
    pub(crate) fn sub(&self, other: &Self) -> Self {
        debug_assert_eq!(self.side, other.side);
        let mut out = Self::zeros(self.side);
        for (dst, (&a, &b)) in out.data.iter_mut().zip(self.data.iter().zip(&other.data)) {
            *dst = a.wrapping_sub(b);
        }
        out
    }

    /// Wrapping matrix product.
    pub(crate) fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.side, other.side);
        let n = self.side;
        let mut out = Self::zeros(n);
        for row in 0..n {
            for col in 0..n {
                let mut acc = 0u64;
                for k in 0..n {
                    acc = acc.wrapping_add(self.get(row, k).wrapping_mul(other.get(k, col)));
                }
                out.set(row, col, acc);
            }
        }
        out
    }

    /// Element-wise wrapping accumulate: `self += other`.
    pub(crate) fn add_assign(&mut self, other: &Self) {
        debug_assert_eq!(self.side, other.side);
        for (dst, &src) in self.data.iter_mut().zip(&other.data) {
            *dst = dst.wrapping_add(src);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(side: usize, f: impl Fn(usize, usize) -> u64) -> QuadWordMatrix {
        let mut m = QuadWordMatrix::zeros(side);
        for r in 0..side {
            for c in 0..side {
                m.set(r, c, f(r, c));
            }
        }
        m
    }

    #[test]
    fn transpose_is_involutive() {
        let m = filled(5, |r, c| (r * 31 + c * 17) as u64);
        let tt = m.transpose().transpose();
        assert_eq!(m.as_slice(), tt.as_slice());
    }

    #[test]
    fn product_against_hand_computed_2x2() {
        let a = filled(2, |r, c| (r * 2 + c + 1) as u64); // [1 2; 3 4]
        let b = filled(2, |r, c| (r * 2 + c + 5) as u64); // [5 6; 7 8]
        let p = a.mul(&b);
        assert_eq!(p.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn arithmetic_wraps() {
        let a = filled(2, |_, _| u64::MAX);
        let b = filled(2, |_, _| 2);
        assert_eq!(a.add(&b).get(0, 0), 1);
        assert_eq!(b.sub(&a).get(1, 1), 3);
        assert_eq!(a.mul(&b).get(0, 0), u64::MAX.wrapping_mul(2).wrapping_mul(2));
    }
}
