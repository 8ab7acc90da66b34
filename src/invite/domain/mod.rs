//! Domain model for task-share invites.

mod error;
mod ids;
mod invite;
mod token;

pub use error::{InviteDomainError, ParseInviteStatusError};
pub use ids::InviteId;
pub use invite::{InviteStatus, NewInviteParams, PersistedInviteData, TaskShareInvite};
pub use token::InviteToken;
