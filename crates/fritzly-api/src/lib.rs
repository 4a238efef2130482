// fritzly-api: Async TR-064 client for FRITZ!Box routers

pub mod auth;
pub mod client;
pub mod description;
pub mod error;
pub mod soap;
pub mod transport;

pub use client::{ConnectOptions, Tr064Client};
pub use description::{ServiceDescriptor, ServiceTable, normalize_service_name};
pub use error::Error;
pub use soap::{ActionResponse, Arguments, SoapValue};
pub use transport::{TlsMode, TransportConfig};
