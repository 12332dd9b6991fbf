mod connection_uri;
mod secret;

pub use connection_uri::ConnectionUri;
pub use secret::Secret;
