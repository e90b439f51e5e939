pub mod metadata_server;
pub mod service_account;
pub mod token_provider;

pub use metadata_server::MetadataServerAuth;
pub use service_account::{ServiceAccountAuth, ServiceAccountKey};
pub use token_provider::{StaticTokenAuth, TokenProvider};
