use std::{error::Error, fmt};

/// The error returned when a value cannot be reconstructed from the byte
/// stream: the buffer ran out, or a tag/length field held something the
/// decoder does not recognize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerdeErr;

impl fmt::Display for SerdeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed byte stream")
    }
}

impl Error for SerdeErr {}
