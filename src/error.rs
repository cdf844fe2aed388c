use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SizerError {
    #[error("Error opening file {}: {source}", .path.display())]
    ResourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error decoding image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed claim record: {0}")]
    MalformedRecord(#[from] RecordError),

    #[error("Invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Scan worker failed: {0}")]
    Worker(String),
}

/// A single claim table row that could not be turned into a claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {kind}")]
pub struct RecordError {
    pub row: usize,
    pub kind: RecordErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordErrorKind {
    #[error("missing {field} field")]
    MissingField { field: &'static str },

    #[error("{field} field is not an integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

pub type Result<T, E = SizerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_missing_field() {
        let error = RecordError {
            row: 4,
            kind: RecordErrorKind::MissingField { field: "class" },
        };
        assert_eq!(error.to_string(), "row 4: missing class field");
    }

    #[test]
    fn test_record_error_invalid_number() {
        let error = RecordError {
            row: 2,
            kind: RecordErrorKind::InvalidNumber {
                field: "red",
                value: "0xff".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "row 2: red field is not an integer: \"0xff\""
        );
    }

    #[test]
    fn test_resource_open_names_the_path() {
        let error = SizerError::ResourceOpen {
            path: PathBuf::from("map.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(error.to_string(), "Error opening file map.png: gone");
    }

    #[test]
    fn test_sizer_error_from_record_error() {
        let record = RecordError {
            row: 1,
            kind: RecordErrorKind::MissingField { field: "name" },
        };
        match SizerError::from(record) {
            SizerError::MalformedRecord(inner) => assert_eq!(inner.row, 1),
            other => panic!("Expected MalformedRecord variant, got {other:?}"),
        }
    }
}
