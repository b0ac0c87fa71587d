//! Flat, contiguous, row-major three-dimensional array.
//!
//! The reconstruction engine stores its basis-function integral tables in a
//! single allocation indexed by `(i, j, k)`:
//!
//! ```text
//! flat = i * (size_y * size_z) + j * size_z + k
//! ```
//!
//! The innermost axis is contiguous, so [`Dense3DArray::row`] hands out the
//! `k`-run for a fixed `(i, j)` as a plain slice. In the engine this is the
//! run of basis functions for one `(dimension, cell)` pair.
//!
//! Per-axis bounds are checked with `debug_assert!` only. Release builds
//! trust the caller on the hot path; the flat access is still memory safe.

use std::ops::{Index, IndexMut};

use bytemuck::Pod;

/// Dense 3-D array of plain-value elements.
///
/// The element type is restricted to [`Pod`] types, i.e. types that are
/// trivially copyable and valid for any bit pattern. Cloning performs a deep
/// copy of the buffer; [`Dense3DArray::take`] moves the buffer out and leaves
/// an empty `0 × 0 × 0` array behind.
///
/// # Example
///
/// ```
/// use bounded_weno::storage::Dense3DArray;
///
/// let mut table = Dense3DArray::<f64>::new(2, 3, 4);
/// table[(1, 2, 3)] = 5.0;
/// assert_eq!(table.get(1, 2, 3), 5.0);
/// assert_eq!(table.size(), 24);
/// assert_eq!(table.row(1, 2), &[0.0, 0.0, 0.0, 5.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dense3DArray<T: Pod> {
    size_x: usize,
    size_y: usize,
    size_z: usize,
    data: Vec<T>,
}

/// Flat element count for the given dimensions, `None` on overflow.
pub(crate) fn checked_volume(size_x: usize, size_y: usize, size_z: usize) -> Option<usize> {
    size_x.checked_mul(size_y)?.checked_mul(size_z)
}

impl<T: Pod> Dense3DArray<T> {
    /// Create a zero-initialised array.
    ///
    /// # Panics
    ///
    /// Panics if `size_x * size_y * size_z` overflows `usize`.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Self {
        let volume = checked_volume(size_x, size_y, size_z).unwrap_or_else(|| {
            panic!(
                "Dense3DArray: volume {}x{}x{} overflows usize",
                size_x, size_y, size_z
            )
        });
        Self {
            size_x,
            size_y,
            size_z,
            data: vec![T::zeroed(); volume],
        }
    }

    /// Wrap an existing flat buffer.
    ///
    /// Returns `None` if the buffer length does not equal the product of the
    /// dimensions.
    pub fn from_vec(size_x: usize, size_y: usize, size_z: usize, data: Vec<T>) -> Option<Self> {
        let volume = checked_volume(size_x, size_y, size_z)?;
        if data.len() != volume {
            return None;
        }
        Some(Self {
            size_x,
            size_y,
            size_z,
            data,
        })
    }

    /// Flat offset of `(i, j, k)`.
    #[inline]
    fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(
            i < self.size_x && j < self.size_y && k < self.size_z,
            "Dense3DArray: access ({}, {}, {}) out of bounds for {}x{}x{}",
            i,
            j,
            k,
            self.size_x,
            self.size_y,
            self.size_z
        );
        i * (self.size_y * self.size_z) + j * self.size_z + k
    }

    /// Element at `(i, j, k)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        self.data[self.flat_index(i, j, k)]
    }

    /// Mutable reference to the element at `(i, j, k)`.
    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize, k: usize) -> &mut T {
        let idx = self.flat_index(i, j, k);
        &mut self.data[idx]
    }

    /// Assign the element at `(i, j, k)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let idx = self.flat_index(i, j, k);
        self.data[idx] = value;
    }

    /// Contiguous run `(i, j, 0..size_z)`.
    #[inline]
    pub fn row(&self, i: usize, j: usize) -> &[T] {
        debug_assert!(
            i < self.size_x && j < self.size_y,
            "Dense3DArray: row ({}, {}) out of bounds for {}x{}x{}",
            i,
            j,
            self.size_x,
            self.size_y,
            self.size_z
        );
        let start = i * (self.size_y * self.size_z) + j * self.size_z;
        &self.data[start..start + self.size_z]
    }

    /// Resize with the legacy flat-prefix semantics.
    ///
    /// Growing keeps the first `size()` elements at their flat offsets and
    /// zero-fills the tail. This preserves linear offsets, not per-axis
    /// sub-blocks: whenever an axis other than `z` changes, elements end up
    /// at different `(i, j, k)` coordinates. Shrinking only truncates the
    /// length; the allocation is kept and no data is cleared.
    ///
    /// Use [`Dense3DArray::resize_preserving`] to keep coordinates stable.
    ///
    /// # Panics
    ///
    /// Panics if the new volume overflows `usize`.
    pub fn resize(&mut self, size_x: usize, size_y: usize, size_z: usize) {
        let volume = checked_volume(size_x, size_y, size_z).unwrap_or_else(|| {
            panic!(
                "Dense3DArray: volume {}x{}x{} overflows usize",
                size_x, size_y, size_z
            )
        });
        self.size_x = size_x;
        self.size_y = size_y;
        self.size_z = size_z;
        if volume > self.data.len() {
            self.data.resize(volume, T::zeroed());
        } else {
            self.data.truncate(volume);
        }
    }

    /// Resize keeping every `(i, j, k)` that is valid in both shapes.
    ///
    /// Elements outside the old shape are zero. Always reallocates.
    ///
    /// # Panics
    ///
    /// Panics if the new volume overflows `usize`.
    pub fn resize_preserving(&mut self, size_x: usize, size_y: usize, size_z: usize) {
        let mut resized = Self::new(size_x, size_y, size_z);
        let nx = self.size_x.min(size_x);
        let ny = self.size_y.min(size_y);
        let nz = self.size_z.min(size_z);
        for i in 0..nx {
            for j in 0..ny {
                let src = &self.row(i, j)[..nz];
                let start = i * (size_y * size_z) + j * size_z;
                resized.data[start..start + nz].copy_from_slice(src);
            }
        }
        *self = resized;
    }

    /// Set every element to zero.
    pub fn set_zero(&mut self) {
        self.data.fill(T::zeroed());
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Move the buffer out, leaving an empty `0 × 0 × 0` array.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extent of the outermost axis.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Extent of the middle axis.
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Extent of the innermost (contiguous) axis.
    #[inline]
    pub fn size_z(&self) -> usize {
        self.size_z
    }

    /// All three extents as `(size_x, size_y, size_z)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.size_x, self.size_y, self.size_z)
    }

    /// Flat row-major view of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat row-major view of the buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the array and return the flat buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Pod> Default for Dense3DArray<T> {
    fn default() -> Self {
        Self {
            size_x: 0,
            size_y: 0,
            size_z: 0,
            data: Vec::new(),
        }
    }
}

impl<T: Pod> Index<(usize, usize, usize)> for Dense3DArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        &self.data[self.flat_index(i, j, k)]
    }
}

impl<T: Pod> IndexMut<(usize, usize, usize)> for Dense3DArray<T> {
    #[inline]
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        let idx = self.flat_index(i, j, k);
        &mut self.data[idx]
    }
}
