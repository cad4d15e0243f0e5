use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tabular input could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("tabular input could not be parsed: {0}")]
    Tabular(#[from] csv::Error),

    /// Neither availability shape recognized, or an input yielded no
    /// musicians or no slots.
    #[error("unusable input: {0}")]
    InputShape(String),

    #[error("configuration out of range: {0}")]
    ConfigurationOutOfRange(String),

    #[error("workbook export failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, Error>;
