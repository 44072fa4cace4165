//! Low-level byte stream parser for CIL instruction decoding.
//!
//! This module provides the [`crate::parser::Parser`] type, a cursor-based binary data
//! parser for reading raw accessor instruction streams. It offers bounds-checked access
//! to binary data in little-endian format; every read operation validates data
//! availability before touching the buffer, so malformed or truncated method bodies
//! surface as [`crate::Error::OutOfBounds`] instead of panics.
//!
//! # Usage Examples
//!
//! ```rust
//! use flatscope::Parser;
//!
//! let data = [0x01, 0x02, 0x03, 0x04];
//! let mut parser = Parser::new(&data);
//!
//! let value = parser.read_le::<u16>()?;
//! assert_eq!(value, 0x0201);
//! # Ok::<(), flatscope::Error>(())
//! ```

use crate::Result;

/// Primitive value types that can be read from a byte stream in little-endian order.
///
/// Implemented for the fixed-width integer types the CIL instruction encoding uses.
pub trait CilIO: Sized {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Decode a value from exactly [`Self::WIDTH`] bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_cil_io {
    ($($t:ty),*) => {
        $(impl CilIO for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut buffer = [0_u8; std::mem::size_of::<$t>()];
                buffer.copy_from_slice(bytes);
                <$t>::from_le_bytes(buffer)
            }
        })*
    };
}

impl_cil_io!(u8, u16, u32, u64, i8, i16, i32, i64);

/// A cursor-based parser for reading binary instruction streams.
///
/// `Parser` maintains an internal position within a byte slice and provides bounds
/// checking to prevent buffer overruns when reading malformed or truncated data.
///
/// # Examples
///
/// ```rust
/// use flatscope::Parser;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut parser = Parser::new(&data);
///
/// let first = parser.read_le::<u32>()?;
/// assert_eq!(first, 0x04030201);
///
/// parser.advance_by(2)?;
/// let last_bytes = parser.read_le::<u16>()?;
/// assert_eq!(last_bytes, 0x0807);
/// # Ok::<(), flatscope::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Returns the current cursor position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// The cursor may land exactly at the end of the data (no further reads possible),
    /// but not beyond it.
    ///
    /// # Arguments
    /// * `amount` - The number of bytes to skip
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing would move past the data end.
    pub fn advance_by(&mut self, amount: usize) -> Result<()> {
        let Some(target) = self.position.checked_add(amount) else {
            return Err(crate::Error::OutOfBounds);
        };

        if target > self.data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        self.position = target;
        Ok(())
    }

    /// Read a little-endian value of type `T` and advance the cursor past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `T::WIDTH` bytes remain.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        let Some(end) = self.position.checked_add(T::WIDTH) else {
            return Err(crate::Error::OutOfBounds);
        };

        if end > self.data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        let value = T::from_le_slice(&self.data[self.position..end]);
        self.position = end;
        Ok(value)
    }
}
