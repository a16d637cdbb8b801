//! End-to-end decision scenarios for the authorization overlay

use nsguard::check::{AccessChecker, AccessRequest, OverlayChecker, PosixChecker};
use nsguard::config::OverlayConfig;
use nsguard::error::{Error, Result};
use nsguard::events::{AclMigration, EventHandler, MutationEvent};
use nsguard::namespace::{AccessMode, AclEntry, FileMode, MemoryNamespace, NodeAccess};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Route overlay logs through `RUST_LOG` when debugging a scenario
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Inner checker that records invocations and returns a fixed outcome
struct SpyChecker {
    calls: Arc<AtomicUsize>,
    deny: bool,
}

impl SpyChecker {
    fn new(deny: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            SpyChecker {
                calls: calls.clone(),
                deny,
            },
            calls,
        )
    }
}

impl AccessChecker for SpyChecker {
    fn check(&self, _ns: &dyn NodeAccess, request: &AccessRequest) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            Err(Error::denied(
                &request.user,
                request.target()?,
                request.access,
            ))
        } else {
            Ok(())
        }
    }
}

/// Inner checker that asserts the target held the expected mode while the
/// delegated check ran, then fails with a non-denial fault
struct ModeProbe {
    path: PathBuf,
    expected_bits: u16,
}

impl AccessChecker for ModeProbe {
    fn check(&self, ns: &dyn NodeAccess, _request: &AccessRequest) -> Result<()> {
        assert_eq!(ns.mode(&self.path)?.bits(), self.expected_bits);
        Err(Error::NodeNotFound(self.path.clone()))
    }
}

fn warehouse() -> MemoryNamespace {
    init_tracing();
    let ns = MemoryNamespace::new();
    ns.add_directory(Path::new("/project"), "hive", "hive", FileMode::new(0o755))
        .unwrap();
    ns.add_directory(Path::new("/project/ns1"), "hive", "hive", FileMode::new(0o771))
        .unwrap();
    ns.add_directory(
        Path::new("/project/ns1/t1"),
        "hive",
        "hive",
        FileMode::new(0o000),
    )
    .unwrap();
    ns.add_directory(Path::new("/other"), "hive", "hive", FileMode::new(0o755))
        .unwrap();
    ns.add_file(Path::new("/other/x"), "hive", "hive", FileMode::new(0o640))
        .unwrap();
    ns
}

fn analyst_grant() -> AclEntry {
    AclEntry::access_group("analysts", AccessMode::READ | AccessMode::EXECUTE)
}

#[test]
fn reserved_path_group_grant_allows_without_inner_checker() {
    let ns = warehouse();
    ns.set_acl_entries(Path::new("/project/ns1"), &[analyst_grant()])
        .unwrap();

    let (spy, calls) = SpyChecker::new(true);
    let overlay = OverlayChecker::new(Box::new(spy), &OverlayConfig::default());

    let request = AccessRequest::for_path(
        &ns,
        "alice",
        &["analysts"],
        AccessMode::READ | AccessMode::EXECUTE,
        Path::new("/project/ns1/t1"),
    );
    overlay.check(&ns, &request).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn reserved_path_write_request_denied_by_same_grant() {
    let ns = warehouse();
    ns.set_acl_entries(Path::new("/project/ns1"), &[analyst_grant()])
        .unwrap();

    let (spy, calls) = SpyChecker::new(false);
    let overlay = OverlayChecker::new(Box::new(spy), &OverlayConfig::default());

    let request = AccessRequest::for_path(
        &ns,
        "alice",
        &["analysts"],
        AccessMode::WRITE,
        Path::new("/project/ns1/t1"),
    );
    let err = overlay.check(&ns, &request).unwrap_err();
    assert!(err.is_access_denied());
    // delegation denial is terminal; a permissive inner checker never runs
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn first_matching_entry_wins_over_later_grant() {
    let ns = warehouse();
    ns.set_acl_entries(
        Path::new("/project/ns1"),
        &[
            AclEntry::access_user("alice", AccessMode::EXECUTE),
            AclEntry::access_group("analysts", AccessMode::all()),
        ],
    )
    .unwrap();

    let (spy, calls) = SpyChecker::new(false);
    let overlay = OverlayChecker::new(Box::new(spy), &OverlayConfig::default());

    let request = AccessRequest::for_path(
        &ns,
        "alice",
        &["analysts"],
        AccessMode::READ,
        Path::new("/project/ns1/t1"),
    );
    let err = overlay.check(&ns, &request).unwrap_err();
    assert!(err.is_access_denied());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn non_reserved_path_is_pure_pass_through() {
    let ns = warehouse();

    for deny in [false, true] {
        let (spy, calls) = SpyChecker::new(deny);
        let overlay = OverlayChecker::new(Box::new(spy), &OverlayConfig::default());

        let request = AccessRequest::for_path(
            &ns,
            "eve",
            &["guests"],
            AccessMode::READ,
            Path::new("/other/x"),
        );
        let outcome = overlay.check(&ns, &request);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.is_err(), deny);
        if let Err(err) = outcome {
            assert!(err.is_access_denied());
        }
    }
}

#[test]
fn elevation_is_visible_to_inner_checker_and_always_restored() {
    let ns = warehouse();
    let target = Path::new("/project/ns1");

    let probe = ModeProbe {
        path: target.to_path_buf(),
        expected_bits: 0o775, // 0o771 widened by 0o005
    };
    let overlay = OverlayChecker::new(Box::new(probe), &OverlayConfig::default());

    let request =
        AccessRequest::for_path(&ns, "eve", &["guests"], AccessMode::READ, target);
    let err = overlay.check(&ns, &request).unwrap_err();
    // the inner fault is re-raised unchanged
    assert!(matches!(err, Error::NodeNotFound(_)));
    // and the original mode is back
    assert_eq!(ns.mode(target).unwrap().bits(), 0o771);
}

#[test]
fn elevation_restores_after_inner_allow() {
    let ns = warehouse();
    let target = Path::new("/project/ns1");

    let (spy, _) = SpyChecker::new(false);
    let overlay = OverlayChecker::new(Box::new(spy), &OverlayConfig::default());

    let request =
        AccessRequest::for_path(&ns, "eve", &["guests"], AccessMode::READ, target);
    overlay.check(&ns, &request).unwrap();
    assert_eq!(ns.mode(target).unwrap().bits(), 0o771);
}

#[test]
fn directory_without_traversal_bit_skips_elevation() {
    let ns = warehouse();
    // /project/ns1/t1 has mode 000 and sits under a no-match parent ACL
    let (spy, calls) = SpyChecker::new(true);
    let overlay = OverlayChecker::new(Box::new(spy), &OverlayConfig::default());

    let request = AccessRequest::for_path(
        &ns,
        "eve",
        &["guests"],
        AccessMode::READ,
        Path::new("/project/ns1/t1"),
    );
    let err = overlay.check(&ns, &request).unwrap_err();
    assert!(err.is_access_denied());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(ns.mode(Path::new("/project/ns1/t1")).unwrap().bits(), 0o000);
}

#[test]
fn overlay_composes_with_posix_checker() {
    let ns = warehouse();
    ns.set_acl_entries(Path::new("/project/ns1"), &[analyst_grant()])
        .unwrap();

    let overlay = OverlayChecker::new(Box::new(PosixChecker::new()), &OverlayConfig::default());

    // grant path: delegation allows what the posix model would deny
    let request = AccessRequest::for_path(
        &ns,
        "alice",
        &["analysts"],
        AccessMode::READ | AccessMode::EXECUTE,
        Path::new("/project/ns1/t1"),
    );
    overlay.check(&ns, &request).unwrap();

    // no grant path: the posix model decides against the elevated mode,
    // which widens the world class to r-x for the scope of the check
    let request = AccessRequest::for_path(
        &ns,
        "eve",
        &["guests"],
        AccessMode::READ,
        Path::new("/project/ns1"),
    );
    overlay.check(&ns, &request).unwrap();
    assert_eq!(ns.mode(Path::new("/project/ns1")).unwrap().bits(), 0o771);

    // write is outside the widened bits and stays denied
    let request = AccessRequest::for_path(
        &ns,
        "eve",
        &["guests"],
        AccessMode::WRITE,
        Path::new("/project/ns1"),
    );
    let err = overlay.check(&ns, &request).unwrap_err();
    assert!(err.is_access_denied());
    assert_eq!(ns.mode(Path::new("/project/ns1")).unwrap().bits(), 0o771);
}

#[test]
fn acl_migration_round_trip_restores_origin() {
    let ns = warehouse();
    ns.add_directory(Path::new("/project/ns2"), "hive", "hive", FileMode::new(0o771))
        .unwrap();
    ns.set_acl_entries(Path::new("/project/ns1"), &[analyst_grant()])
        .unwrap();

    let migration = AclMigration::new();
    migration
        .migrate(&ns, Path::new("/project/ns1"), Path::new("/project/ns2"))
        .unwrap();
    migration
        .migrate(&ns, Path::new("/project/ns2"), Path::new("/project/ns1"))
        .unwrap();

    assert_eq!(
        ns.acl_entries(Path::new("/project/ns1")).unwrap(),
        vec![analyst_grant()]
    );
    assert!(ns.acl_entries(Path::new("/project/ns2")).unwrap().is_empty());
}

#[test]
fn create_then_check_through_the_full_stack() {
    let ns = warehouse();
    let handler = EventHandler::new(&OverlayConfig::default());
    let overlay = OverlayChecker::new(Box::new(PosixChecker::new()), &OverlayConfig::default());

    // a new table lands under /project/ns1 owned by its creator
    ns.add_directory(
        Path::new("/project/ns1/t2"),
        "hive",
        "hive",
        FileMode::new(0o755),
    )
    .unwrap();
    handler
        .handle(
            &ns,
            &MutationEvent::Created {
                path: PathBuf::from("/project/ns1/t2"),
                owner: "alice".to_string(),
                group: "ns1".to_string(),
            },
        )
        .unwrap();

    // the owner passes the wrapped model through the overlay
    let request = AccessRequest::for_path(
        &ns,
        "alice",
        &["ns1"],
        AccessMode::READ | AccessMode::WRITE,
        Path::new("/project/ns1/t2"),
    );
    overlay.check(&ns, &request).unwrap();

    // group members reach it through the creation mode's group bits
    let request = AccessRequest::for_path(
        &ns,
        "bob",
        &["ns1"],
        AccessMode::READ | AccessMode::EXECUTE,
        Path::new("/project/ns1/t2"),
    );
    overlay.check(&ns, &request).unwrap();
}
