#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E4001.to_string(), "E4001");
    assert_eq!(ErrorCode::E4007.as_str(), "E4007");
}

#[test]
fn test_resolver_error_codes() {
    for code in ErrorCode::ALL {
        assert!(code.is_resolver_error(), "{code}");
    }
}

#[test]
fn test_names_are_unique() {
    let mut names: Vec<_> = ErrorCode::ALL.iter().map(ErrorCode::name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), ErrorCode::ALL.len());
    assert_eq!(ErrorCode::E4005.name(), "ParentVarianceMismatch");
}

#[test]
fn test_parse_round_trips_every_code() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e4006".parse::<ErrorCode>(), Ok(ErrorCode::E4006));
}

#[test]
fn test_parse_unknown() {
    let err = "E1234".parse::<ErrorCode>().unwrap_err();
    assert_eq!(err.to_string(), "unknown error code `E1234`");
}
