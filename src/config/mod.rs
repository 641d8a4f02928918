pub mod connection;
pub mod paths;

pub use connection::{HostKeyPolicy, SftpConfig};
