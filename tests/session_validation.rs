use std::path::PathBuf;

use pyrun::config::{ExecutionSession, RawSession, parse_env_pairs};
use pyrun::errors::PyrunError;

fn raw_with(interpreter: &str, script: PathBuf) -> RawSession {
    RawSession {
        interpreter: interpreter.to_string(),
        script,
        ..RawSession::default()
    }
}

#[test]
fn empty_interpreter_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("s.sh");
    std::fs::write(&script, "exit 0\n").unwrap();

    let err = ExecutionSession::try_from(raw_with("", script)).unwrap_err();
    assert!(matches!(err, PyrunError::Validation(_)), "{err}");
}

#[test]
fn nonexistent_interpreter_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("s.sh");
    std::fs::write(&script, "exit 0\n").unwrap();

    let err = ExecutionSession::try_from(raw_with(
        "/definitely/not/here/python3",
        script,
    ))
    .unwrap_err();
    assert!(matches!(err, PyrunError::Validation(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn bare_interpreter_name_is_resolved_on_path() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("s.sh");
    std::fs::write(&script, "exit 0\n").unwrap();

    let session = ExecutionSession::try_from(raw_with("sh", script)).unwrap();
    assert!(session.interpreter.is_absolute());
    assert!(session.interpreter.exists());
}

#[cfg(unix)]
#[test]
fn empty_script_is_rejected() {
    let err =
        ExecutionSession::try_from(raw_with("/bin/sh", PathBuf::new())).unwrap_err();
    assert!(matches!(err, PyrunError::Validation(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn nonexistent_script_is_rejected() {
    let err = ExecutionSession::try_from(raw_with(
        "/bin/sh",
        PathBuf::from("/definitely/not/here/s.py"),
    ))
    .unwrap_err();
    assert!(matches!(err, PyrunError::Validation(_)), "{err}");
}

#[test]
fn env_pairs_parse_and_trim() {
    let pairs = parse_env_pairs("A=1; B = two ;C=x=y").unwrap();
    assert_eq!(
        pairs,
        vec![
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "two".to_string()),
            // Only the first '=' splits; the value keeps the rest.
            ("C".to_string(), "x=y".to_string()),
        ]
    );
}

#[test]
fn empty_env_segments_are_skipped() {
    assert_eq!(parse_env_pairs("").unwrap(), vec![]);
    assert_eq!(parse_env_pairs(";;").unwrap(), vec![]);
    assert_eq!(
        parse_env_pairs("A=1;").unwrap(),
        vec![("A".to_string(), "1".to_string())]
    );
}

#[test]
fn env_pair_without_equals_is_rejected() {
    let err = parse_env_pairs("A=1;BROKEN").unwrap_err();
    assert!(matches!(err, PyrunError::Validation(_)), "{err}");
}

#[test]
fn env_pair_with_empty_key_is_rejected() {
    let err = parse_env_pairs("=value").unwrap_err();
    assert!(matches!(err, PyrunError::Validation(_)), "{err}");
}
