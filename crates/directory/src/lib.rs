//! Client-side access to the administrative directory service
//! (states, districts, sub-districts, villages) and the cascading
//! selection that drives it.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod response;
pub mod selection;

pub use client::DirectoryClient;
pub use endpoint::{DEFAULT_BASE_URL, Endpoint, Level};
pub use error::DirectoryError;
pub use response::decode_response;
pub use selection::Selection;
