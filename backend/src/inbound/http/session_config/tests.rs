//! Unit tests for session configuration.

use super::*;
use rstest::rstest;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'a'; len])
        .expect("key file write should succeed");
    file
}

fn missing_path(dir: &TempDir) -> PathBuf {
    dir.path().join("session_key")
}

fn settings_with_key(path: PathBuf) -> SeatingSettings {
    SeatingSettings {
        session_key_file: Some(path),
        ..SeatingSettings::default()
    }
}

#[rstest]
fn release_reads_the_key_file() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings = settings_with_key(file.path().to_path_buf());

    let session = session_settings(&settings, BuildMode::Release).expect("valid settings");

    assert!(session.cookie_secure);
    assert!(!session.ephemeral);
    assert_eq!(session.same_site, SameSite::Strict);
}

#[rstest]
fn same_key_file_gives_the_same_fingerprint() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings = settings_with_key(file.path().to_path_buf());

    let first = session_settings(&settings, BuildMode::Release).expect("valid settings");
    let second = session_settings(&settings, BuildMode::Release).expect("valid settings");

    assert_eq!(first.key_fingerprint(), second.key_fingerprint());
}

#[rstest]
fn release_missing_key_file_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let settings = settings_with_key(missing_path(&dir));
    let err = session_settings(&settings, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn release_short_key_is_rejected() {
    let file = key_file(32);
    let settings = settings_with_key(file.path().to_path_buf());
    let err = session_settings(&settings, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::KeyTooShort { length: 32, .. })));
}

#[rstest]
#[case(BuildMode::Debug, false)]
#[case(BuildMode::Release, true)]
fn ephemeral_keys_need_debug_or_opt_in(#[case] mode: BuildMode, #[case] allow: bool) {
    let dir = TempDir::new().expect("temp dir");
    let settings = SeatingSettings {
        allow_ephemeral_key: allow,
        ..settings_with_key(missing_path(&dir))
    };
    let session = session_settings(&settings, mode).expect("ephemeral key allowed");
    assert!(session.ephemeral);
}

#[rstest]
fn release_insecure_none_same_site_is_rejected() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings = SeatingSettings {
        cookie_secure: false,
        same_site: Some("None".to_owned()),
        ..settings_with_key(file.path().to_path_buf())
    };
    let err = session_settings(&settings, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::InsecureSameSiteNone)));
}

#[rstest]
#[case(BuildMode::Debug, Some(SameSite::Lax))]
#[case(BuildMode::Release, None)]
fn unknown_same_site_depends_on_mode(#[case] mode: BuildMode, #[case] expected: Option<SameSite>) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings = SeatingSettings {
        same_site: Some("unexpected".to_owned()),
        ..settings_with_key(file.path().to_path_buf())
    };
    let result = session_settings(&settings, mode);
    assert_eq!(result.ok().map(|s| s.same_site), expected);
}

#[rstest]
#[case("strict", SameSite::Strict)]
#[case("LAX", SameSite::Lax)]
#[case("None", SameSite::None)]
fn same_site_values_parse_case_insensitively(#[case] raw: &str, #[case] expected: SameSite) {
    assert_eq!(same_site(Some(raw), BuildMode::Release, true).ok(), Some(expected));
}
