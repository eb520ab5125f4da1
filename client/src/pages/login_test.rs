use super::*;

#[test]
fn validate_login_input_trims_login_but_not_password() {
    assert_eq!(
        validate_login_input("  alice  ", " secret "),
        Ok(("alice".to_owned(), " secret ".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "secret"), Err(MISSING_FIELDS_MESSAGE));
    assert_eq!(validate_login_input("alice", ""), Err(MISSING_FIELDS_MESSAGE));
}
