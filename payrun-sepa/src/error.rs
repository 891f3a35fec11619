/// Everything that can go wrong while assembling a transfer document.
#[derive(Debug, thiserror::Error)]
pub enum SepaError {
    /// A required field was still unset when generation started. Carries the
    /// name of the first missing field.
    #[error("Mandatory field missing: {0}")]
    MandatoryFieldMissing(&'static str),
    #[error("Invalid debtor: {0}")]
    InvalidDebtor(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Unsupported schema: {0}")]
    UnsupportedSchema(String),
    #[error("XML error: {0}")]
    Xml(#[from] xml::writer::Error),
}
