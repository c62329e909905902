//! Chat gateway abstractions.
//!
//! - `ChatGateway`: RPITIT trait for concrete gateway implementations
//! - `BoxChatGateway`: object-safe wrapper chosen once at startup
//! - `PlaceholderGateway`: fixed-reply implementation used when no provider
//!   credentials are configured

pub mod box_gateway;
pub mod placeholder;
pub mod provider;
