//! Text and binary streaming for [`Dense3DArray`].

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use bytemuck::Pod;
use thiserror::Error;

use crate::storage::Dense3DArray;
use crate::storage::dense_3d::checked_volume;

/// Elements read per step of a binary body.
const READ_CHUNK_ELEMENTS: usize = 1 << 16;

/// Error type for container serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Dimensions and element data disagree.
    #[error("Malformed container: {0}")]
    Structural(String),
}

/// Serialized representation of a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Newline-delimited, one value per line.
    #[default]
    Text,
    /// Little-endian `u64` header followed by the raw element bytes.
    Binary,
}

impl<T: Pod> Dense3DArray<T> {
    /// Write the container in the requested encoding.
    pub fn write_to<W: Write>(&self, writer: &mut W, encoding: Encoding) -> Result<(), StorageError>
    where
        T: Display,
    {
        match encoding {
            Encoding::Text => self.write_text(writer),
            Encoding::Binary => self.write_binary(writer),
        }
    }

    /// Read a container in the requested encoding.
    pub fn read_from<R: BufRead>(reader: &mut R, encoding: Encoding) -> Result<Self, StorageError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match encoding {
            Encoding::Text => Self::read_text(reader),
            Encoding::Binary => Self::read_binary(reader),
        }
    }

    /// Write the newline-delimited text form.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), StorageError>
    where
        T: Display,
    {
        let (x, y, z) = self.dims();
        writeln!(writer, "{}", x)?;
        writeln!(writer, "{}", y)?;
        writeln!(writer, "{}", z)?;
        for value in self.as_slice() {
            writeln!(writer, "{}", value)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read the newline-delimited text form.
    ///
    /// Tokens may be separated by any whitespace. The stream must contain
    /// exactly three dimensions and `x * y * z` elements.
    pub fn read_text<R: BufRead>(reader: &mut R) -> Result<Self, StorageError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let mut dims = [0usize; 3];
        let mut n_dims = 0;
        let mut volume = 0;
        let mut data: Vec<T> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            for token in line.split_whitespace() {
                if n_dims < 3 {
                    dims[n_dims] = token.parse::<usize>().map_err(|e| StorageError::Parse {
                        line: line_no + 1,
                        message: format!("invalid dimension '{}': {}", token, e),
                    })?;
                    n_dims += 1;
                    if n_dims == 3 {
                        volume = checked_volume(dims[0], dims[1], dims[2]).ok_or_else(|| {
                            StorageError::Structural(format!(
                                "volume {}x{}x{} overflows",
                                dims[0], dims[1], dims[2]
                            ))
                        })?;
                    }
                    continue;
                }
                if data.len() == volume {
                    return Err(StorageError::Structural(format!(
                        "trailing data at line {}: expected {} elements",
                        line_no + 1,
                        volume
                    )));
                }
                let value = token.parse::<T>().map_err(|e| StorageError::Parse {
                    line: line_no + 1,
                    message: format!("invalid element '{}': {}", token, e),
                })?;
                data.push(value);
            }
        }

        if n_dims < 3 {
            return Err(StorageError::Structural(format!(
                "expected 3 dimensions, found {}",
                n_dims
            )));
        }
        if data.len() != volume {
            return Err(StorageError::Structural(format!(
                "expected {} elements for {}x{}x{}, found {}",
                volume,
                dims[0],
                dims[1],
                dims[2],
                data.len()
            )));
        }

        Self::from_vec(dims[0], dims[1], dims[2], data)
            .ok_or_else(|| StorageError::Structural("element count mismatch".to_string()))
    }

    /// Write the binary bulk form.
    pub fn write_binary<W: Write>(&self, writer: &mut W) -> Result<(), StorageError> {
        let (x, y, z) = self.dims();
        for dim in [x, y, z] {
            writer.write_all(&(dim as u64).to_le_bytes())?;
        }
        writer.write_all(bytemuck::cast_slice(self.as_slice()))?;
        writer.flush()?;
        Ok(())
    }

    /// Read the binary bulk form.
    pub fn read_binary<R: Read>(reader: &mut R) -> Result<Self, StorageError> {
        let mut dims = [0usize; 3];
        for dim in dims.iter_mut() {
            let mut bytes = [0u8; 8];
            read_exact_or_structural(reader, &mut bytes, "dimension header")?;
            *dim = usize::try_from(u64::from_le_bytes(bytes)).map_err(|_| {
                StorageError::Structural("dimension does not fit in usize".to_string())
            })?;
        }

        let volume = checked_volume(dims[0], dims[1], dims[2]).ok_or_else(|| {
            StorageError::Structural(format!(
                "volume {}x{}x{} overflows",
                dims[0], dims[1], dims[2]
            ))
        })?;
        volume
            .checked_mul(std::mem::size_of::<T>())
            .ok_or_else(|| StorageError::Structural("byte length overflows".to_string()))?;

        // Grow with the data actually read, never with the header's claim
        let mut data: Vec<T> = Vec::with_capacity(volume.min(READ_CHUNK_ELEMENTS));
        let mut chunk = vec![T::zeroed(); volume.min(READ_CHUNK_ELEMENTS)];
        while data.len() < volume {
            let n = (volume - data.len()).min(chunk.len());
            read_exact_or_structural(
                reader,
                bytemuck::cast_slice_mut(&mut chunk[..n]),
                "element data",
            )?;
            data.extend_from_slice(&chunk[..n]);
        }

        let mut extra = [0u8; 1];
        if reader.read(&mut extra)? != 0 {
            return Err(StorageError::Structural(format!(
                "trailing data after {} elements",
                volume
            )));
        }

        Self::from_vec(dims[0], dims[1], dims[2], data)
            .ok_or_else(|| StorageError::Structural("element count mismatch".to_string()))
    }

    /// Write the container to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P, encoding: Encoding) -> Result<(), StorageError>
    where
        T: Display,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, encoding)
    }

    /// Read a container from a file.
    pub fn load<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<Self, StorageError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader, encoding)
    }
}

fn read_exact_or_structural<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    what: &str,
) -> Result<(), StorageError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            StorageError::Structural(format!("truncated {}", what))
        }
        _ => StorageError::Io(e),
    })
}
