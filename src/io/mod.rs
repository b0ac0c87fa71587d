//! I/O utilities for reading and writing precomputed tables.
//!
//! This module provides the streamed form of [`Dense3DArray`]:
//!
//! # File Formats
//!
//! ## Text
//!
//! Three dimension integers, then one element per line in row-major order:
//!
//! ```text
//! 2
//! 1
//! 3
//! 0.5
//! -1.25
//! 0
//! 1e-12
//! 3
//! 4
//! ```
//!
//! ## Binary
//!
//! Three little-endian `u64` dimensions followed by the raw element bytes in
//! row-major order (native byte order of the element type).
//!
//! Both encodings round-trip exactly.
//!
//! # Example
//!
//! ```
//! use bounded_weno::io::Encoding;
//! use bounded_weno::storage::Dense3DArray;
//!
//! let mut table = Dense3DArray::<f64>::new(1, 2, 2);
//! table.set(0, 1, 0, 0.1);
//!
//! let mut buf = Vec::new();
//! table.write_to(&mut buf, Encoding::Text).unwrap();
//! let back = Dense3DArray::<f64>::read_from(&mut buf.as_slice(), Encoding::Text).unwrap();
//! assert_eq!(back, table);
//! ```
//!
//! [`Dense3DArray`]: crate::storage::Dense3DArray

mod dense_3d_io;

pub use dense_3d_io::{Encoding, StorageError};
