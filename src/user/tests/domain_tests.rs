//! Unit tests for user domain validation.

use crate::user::domain::{EmailAddress, User, UserDomainError, UserId};
use rstest::rstest;

#[rstest]
#[case("alice@example.com", true)]
#[case("  bob@example.org  ", true)]
#[case("a@b", true)]
#[case("", false)]
#[case("no-at-sign", false)]
#[case("@example.com", false)]
#[case("alice@", false)]
#[case("alice@exa mple.com", false)]
#[case("alice@@example.com", false)]
fn email_validation(#[case] input: &str, #[case] expected_valid: bool) {
    let result = EmailAddress::new(input);
    assert_eq!(result.is_ok(), expected_valid, "input: {input:?}");
}

#[rstest]
fn email_is_trimmed() -> eyre::Result<()> {
    let email = EmailAddress::new("  carol@example.com ")?;
    assert_eq!(email.as_str(), "carol@example.com");
    Ok(())
}

#[rstest]
fn user_rejects_empty_first_name() -> eyre::Result<()> {
    let email = EmailAddress::new("dave@example.com")?;
    let result = User::new(UserId::new(), email, "  ", "Smith");
    assert_eq!(result, Err(UserDomainError::EmptyName));
    Ok(())
}

#[rstest]
#[case("Erin", "Jones", "Erin Jones")]
#[case("Frank", "", "Frank")]
#[case("Grace", "  ", "Grace")]
fn display_name_joins_non_empty_parts(
    #[case] first: &str,
    #[case] last: &str,
    #[case] expected: &str,
) -> eyre::Result<()> {
    let email = EmailAddress::new("user@example.com")?;
    let user = User::new(UserId::new(), email, first, last)?;
    assert_eq!(user.display_name(), expected);
    Ok(())
}
