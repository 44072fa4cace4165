use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors are confined to the low-level decoding layer (instruction streams and operand
/// parsing). Validation findings are never errors — they are collected as diagnostics by
/// the [`crate::validation::MappingReport`] and reported in one pass across the whole
/// scanned universe.
///
/// # Examples
///
/// ```rust
/// use flatscope::{Error, disassembler::scan_calls};
/// use flatscope::metadata::TypeUniverse;
///
/// let universe = TypeUniverse::builder().build();
/// match scan_calls(&[0xFF], &universe) {
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("bad stream: {} ({}:{})", message, file, line);
///     }
///     other => panic!("expected malformed stream, got {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The instruction stream is damaged and could not be decoded.
    ///
    /// This error indicates that an accessor body does not conform to the ECMA-335
    /// instruction encoding (unknown opcode, reserved opcode). The error includes the
    /// source location where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding an instruction stream.
    ///
    /// This error occurs when an instruction's operand extends beyond the end of the
    /// accessor body. It's a safety check to prevent buffer overruns during decoding.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,
}
