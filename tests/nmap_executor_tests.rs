//! Runs the real executor against stand-in nmap scripts.
//!
//! Everything lives in one test so no other test in this binary forks while
//! a freshly written script is being executed.

#![cfg(unix)]

use recon_report::{NmapExecutor, ReportConfig, ReportError, ReportPipeline, ScanProfile};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const FAKE_NMAP: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "Nmap version 7.94"
  exit 0
fi
echo "$@" > "$(dirname "$0")/args.txt"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-oX" ]; then
    shift
    out="$1"
  fi
  shift
done
cat > "$out" <<'EOF'
<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap">
  <host>
    <address addr="127.0.0.1" addrtype="ipv4"/>
    <ports>
      <port protocol="tcp" portid="22"><state state="open"/><service name="ssh"/></port>
      <port protocol="udp" portid="123"><state state="open|filtered"/></port>
    </ports>
  </host>
</nmaprun>
EOF
"#;

const FAILING_NMAP: &str = r#"#!/bin/sh
echo "You requested a scan type which requires root privileges." >&2
exit 1
"#;

fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_nmap_executor_with_stand_in_scripts() {
    let bin_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    let fake = install_script(bin_dir.path(), "nmap", FAKE_NMAP);
    let failing = install_script(bin_dir.path(), "nmap-fail", FAILING_NMAP);

    assert!(NmapExecutor::is_available(fake.to_str().unwrap()).await);

    // successful scan: arguments passed through, document parsed
    let config = ReportConfig::new(vec!["127.0.0.1".to_string()])
        .with_profile(ScanProfile::Quick)
        .with_udp(true)
        .with_rate(100)
        .with_nmap_path(fake.to_string_lossy())
        .with_output_directory(out_dir.path());
    let report = ReportPipeline::new(config, NmapExecutor::new())
        .run()
        .await
        .unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[1].state, "open|filtered");

    let args = fs::read_to_string(bin_dir.path().join("args.txt")).unwrap();
    let expected = format!(
        "-sV -T4 -sU --min-rate 100 -oX {} 127.0.0.1",
        report.artifacts.xml.display()
    );
    assert_eq!(args.trim(), expected);

    // nonzero exit: fatal, stderr surfaced, no reports
    let config = ReportConfig::new(vec!["127.0.0.1".to_string()])
        .with_nmap_path(failing.to_string_lossy())
        .with_output_directory(out_dir.path().join("failed"));
    let err = ReportPipeline::new(config, NmapExecutor::new())
        .run()
        .await
        .unwrap_err();

    match err {
        ReportError::ExternalTool(message) => {
            assert!(message.contains("status 1"));
            assert!(message.contains("requires root privileges"));
        }
        other => panic!("expected ExternalTool, got {:?}", other),
    }
    assert!(!out_dir.path().join("failed").join("results.csv").exists());
}
