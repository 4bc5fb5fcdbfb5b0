//! Test helpers: build AppState and router against a temp data directory
//! and a mock pipeline script.
//!
//! Run from workspace root: `cargo test -p retouch-api`.

pub mod fixtures;

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use retouch_api::setup::routes::setup_routes;
use retouch_api::state::AppState;
use retouch_core::Config;
use tempfile::TempDir;

/// How the mock pipeline script behaves.
#[derive(Clone, Copy, Debug)]
pub enum MockPipeline {
    /// Copies the input into the output directory under the documented
    /// `<basename>_enhanced.png` / `<basename>_restored.png` name.
    Succeed,
    /// Exits zero without writing any output file.
    WriteNothing,
    /// Exits nonzero with a diagnostic on stderr.
    Fail,
    /// Sleeps far past any test timeout.
    Hang,
}

impl MockPipeline {
    fn script(self) -> &'static str {
        match self {
            MockPipeline::Succeed => {
                r#"#!/bin/sh
set -e
skip=0
if [ "$1" = "--skip-esrgan" ]; then skip=1; shift; fi
input="$1"
base=$(basename "$input")
stem="${base%.*}"
out_dir="$(dirname "$(dirname "$input")")/output"
if [ "$skip" = "1" ]; then suffix="_restored.png"; else suffix="_enhanced.png"; fi
cp "$input" "$out_dir/${stem}${suffix}"
"#
            }
            MockPipeline::WriteNothing => "#!/bin/sh\nexit 0\n",
            MockPipeline::Fail => "#!/bin/sh\necho 'no face detected in input' >&2\nexit 1\n",
            MockPipeline::Hang => "#!/bin/sh\nsleep 60\n",
        }
    }
}

/// Test application: server plus the owned temp directory.
pub struct TestApp {
    pub server: TestServer,
    pub data_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn input_dir(&self) -> PathBuf {
        self.data_dir.join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }

    /// Filenames currently present in the input directory.
    pub fn input_entries(&self) -> Vec<String> {
        std::fs::read_dir(self.input_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub async fn setup_test_app(mock: MockPipeline) -> TestApp {
    setup_test_app_with_timeout(mock, 30).await
}

pub async fn setup_test_app_with_timeout(mock: MockPipeline, timeout_secs: u64) -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let data_dir = temp_dir.path().join("data");

    let script_path = temp_dir.path().join("run.sh");
    std::fs::write(&script_path, mock.script()).expect("write mock pipeline");
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod mock pipeline");

    let config = Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        data_dir: data_dir.clone(),
        pipeline_command: script_path,
        pipeline_timeout_secs: timeout_secs,
        max_file_size_bytes: 25 * 1024 * 1024,
        allowed_extensions: ["png", "jpg", "jpeg", "webp"]
            .iter()
            .map(|e| e.to_string())
            .collect(),
        http_concurrency_limit: 64,
    };

    let state = Arc::new(AppState::new(config.clone()));
    state.layout.ensure().await.expect("create storage layout");

    let router = setup_routes(&config, state).expect("build router");
    let server = TestServer::new(router).expect("start test server");

    TestApp {
        server,
        data_dir,
        _temp_dir: temp_dir,
    }
}
