//! Error types for the precor-core library.

use thiserror::Error;

/// Main error type for the precor library.
#[derive(Error, Debug)]
pub enum PrecorError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Requisition field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Index series error.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Value correction error.
    #[error("correction error: {0}")]
    Correction(#[from] CorrectionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to requisition field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// No requisition data could be extracted.
    #[error("no requisition data found")]
    NoData,
}

/// Errors related to obtaining or decoding an index series.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The same month appears more than once.
    #[error("duplicate index month: {0}")]
    DuplicateMonth(String),

    /// An entry could not be decoded.
    #[error("failed to parse index data: {0}")]
    Parse(String),

    /// The series source could not be read.
    #[error("index source unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the indexation calculator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectionError {
    /// The calculator cannot be built from the given index data.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Gross value or base date rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for the precor library.
pub type Result<T> = std::result::Result<T, PrecorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_errors_convert_into_precor_error() {
        let err: PrecorError = ExtractionError::MissingField("gross_value".to_string()).into();
        assert_eq!(
            err.to_string(),
            "extraction error: missing required field: gross_value"
        );

        let err: PrecorError = CorrectionError::InvalidInput("gross value must be positive".to_string()).into();
        assert!(matches!(err, PrecorError::Correction(CorrectionError::InvalidInput(_))));

        let err: PrecorError = IndexError::Unavailable("ipca.json".to_string()).into();
        assert_eq!(err.to_string(), "index error: index source unavailable: ipca.json");
    }
}
