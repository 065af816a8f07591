pub mod api_client;
pub mod csrf;
pub mod http_transport;
