//! Unit tests for the publish service.
//!
//! Runs `Publisher::publish` against the in-memory remote and source from
//! `mocks`, checking the remote tree, the call order and progress events.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use mockall::Sequence;
use mockall::predicate::eq;

use sitepub_cli::application::services::publish::{PublishOptions, Publisher};
use sitepub_cli::domain::{
    Artifact, ArtifactSet, PublishError, ReleaseVersion, RemoteError, RemoteRelPath,
};

use crate::mocks::{MemoryRemote, MemorySource, MockRemote, RecordingReporter};

const ROOT: &str = "~/example.org/lic";
const INDEX: &[u8] = b"<html>v2.3.0</html>\n";
const BUNDLE: &[u8] = b"console.log(1);\r\n\x00\xff";

fn version(v: &str) -> ReleaseVersion {
    ReleaseVersion::parse(v).expect("valid version")
}

fn publisher() -> Publisher {
    Publisher::new(PublishOptions {
        remote_root: ROOT.to_string(),
        version_subdirs: Vec::new(),
    })
}

fn artifacts(remote_paths: &[&str]) -> ArtifactSet {
    ArtifactSet::new(remote_paths.iter().map(|p| Artifact {
        local: PathBuf::from("/build").join(p),
        remote: RemoteRelPath::parse(p).expect("valid remote path"),
    }))
    .expect("non-empty set")
}

fn site_source() -> MemorySource {
    MemorySource::new()
        .with_file("/build/index.html", INDEX)
        .with_file("/build/dist/bundle.js", BUNDLE)
}

// ── Happy path ────────────────────────────────────────────────────────────────

#[test]
fn test_publish_writes_current_and_versioned_copies() {
    let mut remote = MemoryRemote::new();
    let reporter = RecordingReporter::new();
    let set = artifacts(&["index.html", "dist/bundle.js"]);

    let report = publisher()
        .publish(&version("2.3.0"), &set, &mut remote, &site_source(), &reporter)
        .expect("publish succeeds");

    assert_eq!(remote.file("index.html"), Some(INDEX));
    assert_eq!(remote.file("2.3.0/index.html"), Some(INDEX));
    assert_eq!(remote.file("dist/bundle.js"), Some(BUNDLE));
    assert_eq!(remote.file("2.3.0/dist/bundle.js"), Some(BUNDLE));
    assert_eq!(remote.files.len(), 4);

    assert_eq!(remote.ops_of("cwd"), vec![ROOT]);
    assert_eq!(remote.ops_of("mkdir"), vec!["2.3.0", "2.3.0/dist", "dist"]);
    assert!(remote.closed);
    assert_eq!(remote.ops.last().map(String::as_str), Some("close"));

    assert_eq!(reporter.uploads(), vec!["index.html", "dist/bundle.js"]);
    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(report.total_bytes(), (INDEX.len() + BUNDLE.len()) as u64);
    assert_eq!(report.artifacts[1].versioned, "2.3.0/dist/bundle.js");
}

#[test]
fn test_publish_call_order_per_artifact() {
    let mut remote = MemoryRemote::new();
    let set = artifacts(&["index.html"]);

    publisher()
        .publish(
            &version("1.0.0"),
            &set,
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .expect("publish succeeds");

    assert_eq!(
        remote.ops,
        vec![
            format!("cwd {ROOT}"),
            "mkdir 1.0.0".to_string(),
            "delete index.html".to_string(),
            "store index.html".to_string(),
            "store 1.0.0/index.html".to_string(),
            "close".to_string(),
        ]
    );
}

#[test]
fn test_publish_report_digest_is_sha256_of_content() {
    let mut remote = MemoryRemote::new();
    let source = MemorySource::new().with_file("/build/empty.txt", b"");
    let set = artifacts(&["empty.txt"]);

    let report = publisher()
        .publish(&version("1"), &set, &mut remote, &source, &RecordingReporter::new())
        .expect("publish succeeds");

    assert_eq!(report.artifacts[0].bytes, 0);
    assert_eq!(
        report.artifacts[0].sha256,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(remote.file("empty.txt"), Some(&b""[..]));
    assert_eq!(remote.file("1/empty.txt"), Some(&b""[..]));
}

// ── Idempotence and replacement ───────────────────────────────────────────────

#[test]
fn test_publish_twice_yields_same_tree() {
    let mut remote = MemoryRemote::new();
    let set = artifacts(&["index.html", "dist/bundle.js"]);
    let v = version("2.3.0");

    publisher()
        .publish(&v, &set, &mut remote, &site_source(), &RecordingReporter::new())
        .expect("first run");
    let after_first = remote.files.clone();

    publisher()
        .publish(&v, &set, &mut remote, &site_source(), &RecordingReporter::new())
        .expect("second run");

    assert_eq!(remote.files, after_first);
}

#[test]
fn test_publish_replaces_existing_current_copy() {
    let mut remote = MemoryRemote::new()
        .with_file("index.html", b"old")
        .with_file("2.2.0/index.html", b"old");
    let set = artifacts(&["index.html"]);

    publisher()
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .expect("publish succeeds");

    assert_eq!(remote.file("index.html"), Some(INDEX));
    assert_eq!(remote.file("2.3.0/index.html"), Some(INDEX));
    assert_eq!(remote.file("2.2.0/index.html"), Some(&b"old"[..]), "older release kept");
}

#[test]
fn test_publish_existing_directories_are_not_an_error() {
    let mut remote = MemoryRemote::new().with_file("2.3.0/dist/bundle.js", b"stale");
    remote.dirs.insert("dist".to_string());
    let set = artifacts(&["index.html", "dist/bundle.js"]);

    publisher()
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .expect("already-existing directories are tolerated");

    assert_eq!(remote.file("2.3.0/dist/bundle.js"), Some(BUNDLE));
}

#[test]
fn test_publish_creates_version_subdirs() {
    let mut remote = MemoryRemote::new();
    let publisher = Publisher::new(PublishOptions {
        remote_root: ROOT.to_string(),
        version_subdirs: vec![
            RemoteRelPath::parse("static/models").expect("valid"),
            RemoteRelPath::parse("assets").expect("valid"),
        ],
    });
    let set = artifacts(&["index.html"]);

    publisher
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .expect("publish succeeds");

    assert_eq!(
        remote.ops_of("mkdir"),
        vec!["2.3.0", "2.3.0/static", "2.3.0/static/models", "2.3.0/assets"]
    );
}

// ── Recoverable remote conditions ─────────────────────────────────────────────

#[test]
fn test_delete_not_found_proceeds_to_upload() {
    let mut remote = MemoryRemote::new();
    remote.fail_delete = Some(RemoteError::NotFound);
    let set = artifacts(&["index.html"]);

    publisher()
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .expect("missing current copy is fine");

    assert_eq!(remote.file("index.html"), Some(INDEX));
}

// ── Fatal conditions ──────────────────────────────────────────────────────────

#[test]
fn test_delete_permission_denied_aborts_before_store() {
    let mut remote = MemoryRemote::new();
    remote.fail_delete = Some(RemoteError::PermissionDenied("550 denied".to_string()));
    let reporter = RecordingReporter::new();
    let set = artifacts(&["index.html", "dist/bundle.js"]);

    let err = publisher()
        .publish(&version("2.3.0"), &set, &mut remote, &site_source(), &reporter)
        .unwrap_err();

    assert!(
        matches!(err, PublishError::Delete { ref artifact, .. } if artifact == "index.html"),
        "got: {err:?}"
    );
    assert_eq!(err.code(), "REMOTE_DELETE_FAILED");
    assert!(remote.ops_of("store").is_empty());
    assert!(reporter.uploads().is_empty());
    assert!(remote.closed, "session closed after failure");
}

#[test]
fn test_missing_local_artifact_aborts_before_remote_changes() {
    let mut remote = MemoryRemote::new();
    let source = MemorySource::new().with_file("/build/index.html", INDEX);
    let reporter = RecordingReporter::new();
    let set = artifacts(&["index.html", "dist/bundle.js"]);

    let err = publisher()
        .publish(&version("2.3.0"), &set, &mut remote, &source, &reporter)
        .unwrap_err();

    assert!(
        matches!(err, PublishError::LocalArtifactMissing { .. }),
        "got: {err:?}"
    );
    assert!(err.to_string().contains("bundle.js"), "names the artifact: {err}");
    assert!(remote.ops_of("mkdir").is_empty());
    assert!(remote.ops_of("delete").is_empty());
    assert!(remote.ops_of("store").is_empty());
    assert!(reporter.uploads().is_empty());
}

#[test]
fn test_artifact_vanishing_after_preflight_keeps_remote_copy() {
    let mut remote = MemoryRemote::new().with_file("index.html", b"live");
    let mut source = site_source();
    source.vanishing.insert(PathBuf::from("/build/index.html"));
    let set = artifacts(&["index.html"]);

    let err = publisher()
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &source,
            &RecordingReporter::new(),
        )
        .unwrap_err();

    assert_eq!(err.code(), "LOCAL_ARTIFACT_MISSING");
    assert_eq!(remote.file("index.html"), Some(&b"live"[..]));
    assert!(remote.ops_of("delete").is_empty());
}

#[test]
fn test_unreadable_artifact_reports_reason() {
    let mut remote = MemoryRemote::new();
    let mut source = site_source();
    source.unreadable.insert(PathBuf::from("/build/index.html"));
    let set = artifacts(&["index.html"]);

    let err = publisher()
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &source,
            &RecordingReporter::new(),
        )
        .unwrap_err();

    assert_eq!(err.code(), "LOCAL_ARTIFACT_UNREADABLE");
    assert!(err.to_string().contains("denied"), "got: {err}");
}

#[test]
fn test_store_failure_keeps_earlier_artifacts() {
    let mut remote = MemoryRemote::new();
    remote.fail_store_at = Some("2.3.0/dist/bundle.js".to_string());
    let reporter = RecordingReporter::new();
    let set = artifacts(&["index.html", "dist/bundle.js"]);

    let err = publisher()
        .publish(&version("2.3.0"), &set, &mut remote, &site_source(), &reporter)
        .unwrap_err();

    assert!(
        matches!(err, PublishError::Store { ref path, .. } if path == "2.3.0/dist/bundle.js"),
        "got: {err:?}"
    );
    assert_eq!(remote.file("index.html"), Some(INDEX));
    assert_eq!(remote.file("2.3.0/index.html"), Some(INDEX));
    assert_eq!(remote.file("dist/bundle.js"), Some(BUNDLE), "no rollback");
    assert_eq!(reporter.uploads(), vec!["index.html"]);
}

#[test]
fn test_mkdir_failure_is_fatal() {
    let mut remote = MemoryRemote::new();
    remote.fail_mkdir = Some(RemoteError::PermissionDenied("550 denied".to_string()));
    let set = artifacts(&["index.html"]);

    let err = publisher()
        .publish(
            &version("2.3.0"),
            &set,
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .unwrap_err();

    assert!(
        matches!(err, PublishError::CreateDirectory { ref path, .. } if path == "2.3.0"),
        "got: {err:?}"
    );
    assert!(remote.ops_of("store").is_empty());
}

// ── Exact call sequence (mockall) ─────────────────────────────────────────────

#[test]
fn test_change_dir_failure_stops_before_any_mutation() {
    let mut remote = MockRemote::new();
    let mut seq = Sequence::new();
    remote
        .expect_change_dir()
        .with(eq(ROOT))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(RemoteError::NotFound));
    remote
        .expect_close()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    remote.expect_make_dir().never();
    remote.expect_delete().never();
    remote.expect_store().never();

    let err = publisher()
        .publish(
            &version("2.3.0"),
            &artifacts(&["index.html"]),
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .unwrap_err();

    assert_eq!(err.code(), "REMOTE_CHDIR_FAILED");
}

#[test]
fn test_close_failure_is_reported_once() {
    let mut remote = MockRemote::new();
    remote.expect_change_dir().returning(|_| Ok(()));
    remote.expect_make_dir().returning(|_| Ok(()));
    remote.expect_delete().returning(|_| Err(RemoteError::NotFound));
    remote
        .expect_store()
        .times(2)
        .returning(|_, contents| Ok(contents.len() as u64));
    remote
        .expect_close()
        .times(1)
        .returning(|| Err(RemoteError::ConnectionLost("421".to_string())));

    let err = publisher()
        .publish(
            &version("2.3.0"),
            &artifacts(&["index.html"]),
            &mut remote,
            &site_source(),
            &RecordingReporter::new(),
        )
        .unwrap_err();

    assert_eq!(err.code(), "REMOTE_CLOSE_FAILED");
}

// ── Planning ──────────────────────────────────────────────────────────────────

#[test]
fn test_directories_parents_before_children() {
    let set = artifacts(&["static/models/car.ldr", "index.html", "static/app.js"]);
    let dirs = publisher().directories(&version("3.0.0"), &set);
    assert_eq!(
        dirs,
        vec![
            "3.0.0",
            "3.0.0/static",
            "3.0.0/static/models",
            "static",
            "static/models",
        ]
    );
}
