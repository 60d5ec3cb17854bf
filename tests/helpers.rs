// Shared test helpers for starting the audit server against fake tools.
//
// The audit tool is faked with shell scripts written into a TempDir; the
// scripts' absolute paths go into Settings::tool_candidates so no real
// SquirrelScan install is needed.

use std::fs;
use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use audit_gateway::{build_router, AppState, DriveClient, Settings};

/// API key every test server is configured with.
#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-key-123";

/// Writes an executable shell script into `dir` and returns its path.
#[allow(dead_code)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("make fake tool executable");
    path
}

/// Fake audit tool that answers `--version` and writes `report` to the
/// path given after `--output`.
#[allow(dead_code)]
pub fn reporting_script(dir: &Path, report: &str) -> PathBuf {
    write_script(
        dir,
        "fakescan",
        &format!(
            r#"if [ "$1" = "--version" ]; then echo "fakescan 1.0.0"; exit 0; fi
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; shift; fi
  shift
done
printf '%s' '{report}' > "$out""#
        ),
    )
}

/// Settings wired to one fake tool, with fast timeouts for tests.
#[allow(dead_code)]
pub fn test_settings(tool: &Path, temp_dir: &Path) -> Settings {
    Settings {
        api_key: TEST_API_KEY.to_string(),
        temp_dir: temp_dir.to_path_buf(),
        tool_candidates: vec![tool.to_str().expect("utf-8 script path").to_string()],
        probe_timeout: Duration::from_secs(3),
        version_check_timeout: Duration::from_secs(3),
        audit_timeout: Duration::from_secs(10),
        batch_delay: Duration::from_millis(10),
        ..Settings::default()
    }
}

/// Settings whose tool candidates point at binaries that do not exist.
#[allow(dead_code)]
pub fn settings_without_tool(temp_dir: &Path) -> Settings {
    Settings {
        api_key: TEST_API_KEY.to_string(),
        temp_dir: temp_dir.to_path_buf(),
        tool_candidates: vec![
            temp_dir.join("no-such-tool").to_string_lossy().into_owned(),
            temp_dir.join("also-missing").to_string_lossy().into_owned(),
        ],
        probe_timeout: Duration::from_millis(500),
        version_check_timeout: Duration::from_millis(500),
        batch_delay: Duration::from_millis(10),
        ..Settings::default()
    }
}

/// Binds an ephemeral port, serves the router on it, and returns the address.
#[allow(dead_code)]
pub async fn spawn_server(settings: Settings, drive: Option<DriveClient>) -> SocketAddr {
    let app = build_router(AppState::new(settings, drive));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    addr
}

/// Client with no special configuration; one per test keeps pools isolated.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}
