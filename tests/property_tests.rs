//! Property-based tests for repository locations.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Anonymized output never contains the password
//! - Comparison paths are idempotent
//! - Equality is symmetric and ignores credentials, ports and `.git`
//! - Unset locations are never equal to anything

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use okteto_repository::location::{comparison_path, is_equal};
use okteto_repository::{Credentials, RepositoryLocation};
use proptest::prelude::*;

fn host() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,15}(\\.[a-z]{2,6}){1,2}"
}

fn repo_path() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,12}(/[a-z][a-z0-9_-]{0,12}){0,3}"
}

// ============================================================================
// Anonymization
// ============================================================================

proptest! {
    /// Property: the password never appears in anonymized output.
    #[test]
    fn prop_anonymized_hides_password(
        host in host(),
        path in repo_path(),
        user in "[a-z]{1,8}",
        password in "[A-Z]{12,24}",
    ) {
        let raw = format!("https://{user}:{password}@{host}/{path}");
        let loc = RepositoryLocation::parse(&raw).unwrap();

        prop_assert!(!loc.anonymized().contains(&password));
        prop_assert!(!loc.to_string().contains(&password));
        let debug = format!("{loc:?}");
        prop_assert!(!debug.contains(&password));
        let expected = format!("https://{host}/{path}");
        prop_assert_eq!(loc.anonymized(), expected);
    }

    /// Property: parsing the anonymized form yields an equal location.
    #[test]
    fn prop_anonymized_reparses_equal(host in host(), path in repo_path()) {
        let loc = RepositoryLocation::parse(&format!("git@{host}:{path}.git")).unwrap();
        let reparsed = RepositoryLocation::parse(&loc.anonymized()).unwrap();

        prop_assert!(loc.is_equal_to(&reparsed));
        prop_assert!(reparsed.credentials().is_none());
    }
}

// ============================================================================
// Equality
// ============================================================================

proptest! {
    /// Property: comparison paths are idempotent for repository paths.
    #[test]
    fn prop_comparison_path_idempotent(path in repo_path(), slash in any::<bool>(), git in any::<bool>()) {
        let mut raw = if slash { format!("/{path}") } else { path };
        if git {
            raw.push_str(".git");
        }
        let once = comparison_path(&raw);
        prop_assert_eq!(comparison_path(once), once);
    }

    /// Property: the https and SSH shorthand forms of a repository are equal.
    #[test]
    fn prop_https_equals_ssh_shorthand(host in host(), path in repo_path()) {
        let https = RepositoryLocation::parse(&format!("https://{host}/{path}")).unwrap();
        let ssh = RepositoryLocation::parse(&format!("git@{host}:{path}.git")).unwrap();

        prop_assert!(https.is_equal_to(&ssh));
        prop_assert!(ssh.is_equal_to(&https));
    }

    /// Property: credentials and ports never affect equality.
    #[test]
    fn prop_equality_ignores_credentials_and_port(
        host in host(),
        path in repo_path(),
        port in 1u16..,
    ) {
        let plain = RepositoryLocation::new("https", host.clone(), format!("/{path}"));
        let decorated = RepositoryLocation::new("https", host, format!("/{path}"))
            .with_port(port)
            .with_credentials(Credentials::user_password("git", "PASSWORD"));

        prop_assert!(plain.is_equal_to(&decorated));
    }

    /// Property: locations on different hosts are never equal.
    #[test]
    fn prop_different_hosts_not_equal(a in host(), b in host(), path in repo_path()) {
        prop_assume!(a != b);
        let left = RepositoryLocation::new("https", a, path.clone());
        let right = RepositoryLocation::new("https", b, path);

        prop_assert!(!left.is_equal_to(&right));
        prop_assert!(!right.is_equal_to(&left));
    }

    /// Property: hostnames differing only in case are not equal.
    #[test]
    fn prop_host_case_is_significant(host in host(), path in repo_path()) {
        let upper = host.to_uppercase();
        let lower = RepositoryLocation::parse(&format!("https://{host}/{path}")).unwrap();
        let mixed = RepositoryLocation::parse(&format!("https://{upper}/{path}")).unwrap();

        prop_assert_eq!(mixed.host(), upper.as_str());
        prop_assert!(!lower.is_equal_to(&mixed));
    }

    /// Property: an unset location is never equal to anything.
    #[test]
    fn prop_unset_never_equal(host in host(), path in repo_path()) {
        let loc = RepositoryLocation::new("https", host, path);

        prop_assert!(!is_equal(None, Some(&loc)));
        prop_assert!(!is_equal(Some(&loc), None));
        prop_assert!(!is_equal(None, None));
        prop_assert!(is_equal(Some(&loc), Some(&loc)));
    }
}
