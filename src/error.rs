// Error taxonomy for the import/export pipelines

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    /// Payload parsed as XML but does not match the expected record shape
    #[error("XML decode error: {0}")]
    Decode(#[from] quick_xml::DeError),

    /// Payload is not well-formed XML
    #[error("Malformed XML: {0}")]
    MalformedXml(#[from] quick_xml::Error),

    #[error("Unexpected root element: expected <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("XML encode error: {0}")]
    Encode(String),

    /// A price aggregate left the decimal range
    #[error("Arithmetic overflow: {context}")]
    Overflow { context: String },

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ShopError {
    /// True for every failure caused by the incoming XML payload
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ShopError::Decode(_) | ShopError::MalformedXml(_) | ShopError::UnexpectedRoot { .. }
        )
    }

    pub fn is_store(&self) -> bool {
        matches!(self, ShopError::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
