//! Remote tool-call transport: JSON-RPC over HTTP
//!
//! The server side exposes a small calculator (`add`, `multiply`) on a
//! single POST endpoint; the client side speaks the same frames and maps
//! call outcomes into result envelopes.

pub mod client;
pub mod protocol;
pub mod server;

pub use client::McpClient;
pub use protocol::{RemoteToolInfo, DEFAULT_ADDR, ENDPOINT_PATH, PROTOCOL_VERSION};
pub use server::{bind, BoundServer};
