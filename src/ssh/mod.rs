//! SSH transport: host key verification for the SFTP session.

pub mod handler;
pub mod known_hosts;

pub use handler::ClientHandler;
pub use known_hosts::{HostKeyStatus, KnownHostsManager};
