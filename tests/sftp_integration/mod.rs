//! SFTP integration tests
//!
//! These tests require Docker to run a test SFTP server.
//! The server is automatically started when tests run.
//!
//! ## Running the tests
//!
//! ```bash
//! # Run the tests (Docker containers start automatically)
//! cargo test --test sftp_integration
//!
//! # Cleanup (optional - containers are reused)
//! cd tests/docker && docker-compose down -v
//! ```

#[macro_use]
pub mod fixtures;

mod driver_tests;
