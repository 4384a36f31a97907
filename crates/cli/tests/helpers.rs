use std::fs;

use classify::{canonicalize_or_current, sha256_file};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    std::env::set_current_dir(original).expect("restore cwd");
    assert_eq!(result, expected);
}

#[test]
fn canonicalize_or_current_resolves_existing_absolute_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("rootfs");
    fs::create_dir_all(&subdir).expect("create rootfs");

    let result =
        canonicalize_or_current(subdir.to_str().expect("utf8 path")).expect("canonicalize");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_keeps_missing_paths_absolute() {
    let result = canonicalize_or_current("does/not/exist").expect("fallback");
    assert!(result.is_absolute());
    assert!(result.ends_with("does/not/exist"));
}

#[test]
fn sha256_file_hashes_content() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("abc");
    fs::write(&path, b"abc").expect("write");
    assert_eq!(
        sha256_file(&path).expect("hash"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_file_reports_missing_file() {
    let tmp = tempdir().expect("tempdir");
    let err = sha256_file(&tmp.path().join("missing")).unwrap_err();
    assert!(err.to_string().contains("Failed to open file for hashing"));
}
