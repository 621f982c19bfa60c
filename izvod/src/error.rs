use std::{error::Error, fmt, io::Error as IoError};
use quick_xml::se::SeError;

/// Errors while converting a statement.
///
/// Extraction and decoding are total: a fragment that fails its pattern is
/// skipped, never reported. Only the edges of the pipeline can fail, reading
/// the HTML and writing the XML.
#[derive(Debug)]
pub enum ConvertError {
    /// wrapper around std::io::Error
    Io(IoError),
    /// wrapper around quick_xml::se::SeError
    XmlSe(SeError),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io(e) => write!(f, "io error: {e}"),
            ConvertError::XmlSe(e) => write!(f, "xml serialization error: {e}"),
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConvertError::Io(e) => Some(e),
            ConvertError::XmlSe(e) => Some(e),
        }
    }
}

impl From<IoError> for ConvertError {
    fn from(e: IoError) -> Self {
        ConvertError::Io(e)
    }
}

impl From<SeError> for ConvertError {
    fn from(e: SeError) -> Self {
        ConvertError::XmlSe(e)
    }
}
