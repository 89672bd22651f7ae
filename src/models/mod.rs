pub mod error;
pub mod request;
pub mod response;

pub use error::BridgeError;
pub use request::{BridgeRequest, decode_object, safe_json};
pub use response::{BridgeResponse, ConvenienceFields, RequestEcho};
