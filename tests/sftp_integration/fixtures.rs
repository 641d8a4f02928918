//! Docker-based SFTP test fixtures

use std::path::PathBuf;
use std::process::Command;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use sftp_adapter::{HostKeyPolicy, SftpConfig};

// Ensure Docker containers are started only once per test run
static DOCKER_INIT: Once = Once::new();
static DOCKER_AVAILABLE: AtomicBool = AtomicBool::new(false);

/// Seeded read tree, mounted from tests/docker/fixtures
pub const FIXTURE_ROOT: &str = "/fixtures";

/// Directory the test user may write to
pub const WRITABLE_ROOT: &str = "/upload";

/// Configuration for the test SFTP server
#[derive(Debug, Clone)]
pub struct TestSftpServer {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for TestSftpServer {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2222,
            username: "testuser".to_string(),
            password: "testpass123".to_string(),
        }
    }
}

/// Start Docker containers for SFTP testing
pub fn ensure_docker_started() {
    DOCKER_INIT.call_once(|| {
        let docker_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/docker");

        // Check if Docker is available
        let docker_check = Command::new("docker").arg("--version").output();

        if docker_check.is_err() {
            eprintln!("WARNING: Docker not available, SFTP integration tests will be skipped");
            return;
        }

        // Check if docker-compose or docker compose is available
        let compose_cmd = if Command::new("docker-compose")
            .arg("--version")
            .output()
            .is_ok()
        {
            "docker-compose"
        } else if Command::new("docker")
            .args(["compose", "version"])
            .output()
            .is_ok()
        {
            "docker"
        } else {
            eprintln!("WARNING: docker-compose not available");
            return;
        };

        let status = if compose_cmd == "docker" {
            Command::new("docker")
                .current_dir(&docker_dir)
                .args(["compose", "up", "-d", "--wait"])
                .status()
        } else {
            Command::new(compose_cmd)
                .current_dir(&docker_dir)
                .args(["up", "-d", "--wait"])
                .status()
        };

        match status {
            Ok(s) if s.success() => {
                DOCKER_AVAILABLE.store(true, Ordering::SeqCst);
                eprintln!("SFTP test container started successfully");
            }
            Ok(s) => {
                eprintln!(
                    "Failed to start SFTP test container: exit code {:?}",
                    s.code()
                );
            }
            Err(e) => {
                eprintln!("Failed to start SFTP test container: {}", e);
            }
        }
    });
}

/// Check if Docker containers are running
pub fn is_docker_available() -> bool {
    ensure_docker_started();
    DOCKER_AVAILABLE.load(Ordering::SeqCst)
}

/// Wait for the SSH port to accept connections
pub async fn wait_for_ssh_ready(host: &str, port: u16) -> Result<(), String> {
    let addr = format!("{}:{}", host, port);
    let max_attempts = 30;

    for attempt in 1..=max_attempts {
        match timeout(Duration::from_secs(2), TcpStream::connect(&addr)).await {
            Ok(Ok(_)) => return Ok(()),
            _ => {
                if attempt == max_attempts {
                    return Err(format!(
                        "SSH server not ready after {} attempts",
                        max_attempts
                    ));
                }
                sleep(Duration::from_millis(200)).await;
            }
        }
    }

    Err("SSH server not ready".to_string())
}

/// Test environment with isolated known_hosts and Docker fixtures
pub struct SftpTestEnvironment {
    pub server: TestSftpServer,
    pub config_dir: TempDir,
    pub known_hosts_path: PathBuf,
}

impl SftpTestEnvironment {
    pub async fn new() -> Result<Self, String> {
        if !is_docker_available() {
            return Err("Docker not available".to_string());
        }

        let server = TestSftpServer::default();
        wait_for_ssh_ready(&server.host, server.port).await?;

        let config_dir = TempDir::new().map_err(|e| format!("Failed to create temp dir: {}", e))?;
        let known_hosts_path = config_dir.path().join("known_hosts");

        Ok(Self {
            server,
            config_dir,
            known_hosts_path,
        })
    }

    /// Adapter config pointing at the test server with an isolated known_hosts
    pub fn config(&self) -> SftpConfig {
        self.config_with_password(&self.server.password)
    }

    pub fn config_with_password(&self, password: &str) -> SftpConfig {
        let mut config = SftpConfig::new(
            self.server.host.clone(),
            self.server.port,
            self.server.username.clone(),
            SecretString::from(password.to_string()),
            0o755,
        );
        config.known_hosts_path = Some(self.known_hosts_path.clone());
        config.host_key_policy = HostKeyPolicy::AcceptNew;
        config.connection_timeout_secs = 10;
        config
    }

    /// A fresh, not yet existing directory under the writable root
    pub fn scratch_dir(&self) -> String {
        format!("{}/{}", WRITABLE_ROOT, uuid::Uuid::new_v4().simple())
    }
}

/// Macro to skip tests when Docker is not available
#[macro_export]
macro_rules! skip_if_no_docker {
    () => {
        if !super::fixtures::is_docker_available() {
            eprintln!("Skipping test: Docker not available");
            return;
        }
    };
}
