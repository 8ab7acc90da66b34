//! Unit tests for invite domain types and the opaque token.

use crate::invite::domain::{
    InviteDomainError, InviteStatus, InviteToken, NewInviteParams, TaskShareInvite,
};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::collections::HashSet;

#[fixture]
fn invite() -> TaskShareInvite {
    TaskShareInvite::new(
        NewInviteParams {
            sender: UserId::new(),
            receiver: UserId::new(),
            task_id: TaskId::new(),
            token: InviteToken::generate(),
        },
        &DefaultClock,
    )
}

#[rstest]
fn generated_tokens_are_hex_and_unique() {
    let tokens: HashSet<String> = (0..64)
        .map(|_| InviteToken::generate().as_str().to_owned())
        .collect();

    assert_eq!(tokens.len(), 64);
    for token in &tokens {
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[rstest]
#[case("a1b2c3", true)]
#[case("  padded-token  ", true)]
#[case("", false)]
#[case("   ", false)]
#[case("has space", false)]
fn token_wrapping_validates_shape(#[case] input: &str, #[case] expected_valid: bool) {
    assert_eq!(InviteToken::new(input).is_ok(), expected_valid);
}

#[rstest]
fn new_invite_starts_pending(invite: TaskShareInvite) {
    assert_eq!(invite.status(), InviteStatus::Pending);
    assert!(invite.is_pending());
    assert!(invite.shared_task().is_none());
    assert!(invite.responded_at().is_none());
}

#[rstest]
fn accept_records_copy_and_response_stamp(mut invite: TaskShareInvite) -> eyre::Result<()> {
    let copy = TaskId::new();

    invite.accept(copy, &DefaultClock).map_err(|err| eyre::eyre!(err))?;

    assert_eq!(invite.status(), InviteStatus::Accepted);
    assert_eq!(invite.shared_task(), Some(copy));
    assert!(invite.responded_at().is_some());
    Ok(())
}

#[rstest]
fn decline_leaves_no_copy(mut invite: TaskShareInvite) -> eyre::Result<()> {
    invite.decline(&DefaultClock).map_err(|err| eyre::eyre!(err))?;

    assert_eq!(invite.status(), InviteStatus::Declined);
    assert!(invite.shared_task().is_none());
    assert!(invite.responded_at().is_some());
    Ok(())
}

#[rstest]
fn terminal_invites_reject_further_transitions(mut invite: TaskShareInvite) -> eyre::Result<()> {
    invite.decline(&DefaultClock).map_err(|err| eyre::eyre!(err))?;
    let invite_id = invite.id();

    let accept_after = invite.accept(TaskId::new(), &DefaultClock);
    assert_eq!(
        accept_after,
        Err(InviteDomainError::AlreadyResolved {
            id: invite_id,
            current: InviteStatus::Declined,
        })
    );

    let decline_after = invite.decline(&DefaultClock);
    assert_eq!(
        decline_after,
        Err(InviteDomainError::AlreadyResolved {
            id: invite_id,
            current: InviteStatus::Declined,
        })
    );
    assert_eq!(invite.status(), InviteStatus::Declined);
    Ok(())
}
