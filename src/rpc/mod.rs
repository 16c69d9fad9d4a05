// Minimal XML-RPC codec for the Odoo external API

pub mod decode;
pub mod encode;
pub mod value;

pub use decode::decode_response;
pub use encode::encode_method_call;
pub use value::Value;

use thiserror::Error;

/// Errors from the XML-RPC transport and codec
#[derive(Debug, Error)]
pub enum RpcError {
    /// The server answered with a `<fault>` response
    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// Network or other HTTP error
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body was not a well-formed methodResponse
    #[error("Failed to parse XML-RPC response: {0}")]
    Parse(String),
}
