// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request-scoped identity and authorization.
//!
//! Every handler receives an explicit [`AuthenticatedActor`] instead of
//! reading ambient auth state. Credential verification is delegated to
//! an external identity provider; this layer resolves the caller's
//! roles and enforces role checks per action.

use swimops_domain::Role;
use swimops_persistence::{Persistence, PersistenceError};

use crate::error::AuthError;

/// An authenticated caller with their resolved roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's profile id.
    pub user_id: i64,
    /// Roles resolved from the roles association. A profile with no
    /// role rows holds the default `parent` role.
    pub roles: Vec<Role>,
}

impl AuthenticatedActor {
    /// Creates an actor from a profile id and resolved roles.
    #[must_use]
    pub fn new(user_id: i64, mut roles: Vec<Role>) -> Self {
        if roles.is_empty() {
            roles.push(Role::Parent);
        }
        Self { user_id, roles }
    }
}

/// Pure role check: does the identity hold any of the required roles?
#[must_use]
pub fn has_role(actor: &AuthenticatedActor, required: &[Role]) -> bool {
    required.iter().any(|role| actor.roles.contains(role))
}

/// Resolves an authenticated actor from a profile id.
///
/// The identity provider has already verified credentials upstream;
/// this resolves the profile and its roles for authorization.
///
/// # Errors
///
/// Returns an error if the profile does not exist or the role lookup
/// fails.
pub fn authenticate(
    persistence: &mut Persistence,
    actor_id: i64,
) -> Result<AuthenticatedActor, AuthError> {
    match persistence.get_profile(actor_id) {
        Ok(_) => {}
        Err(PersistenceError::NotFound(_)) => {
            return Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown profile id {actor_id}"),
            });
        }
        Err(e) => {
            return Err(AuthError::AuthenticationFailed {
                reason: e.to_string(),
            });
        }
    }

    let role_strings = persistence
        .get_roles_for_user(actor_id)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: e.to_string(),
        })?;

    let mut roles = Vec::new();
    for role in &role_strings {
        roles.push(
            role.parse::<Role>()
                .map_err(|e| AuthError::AuthenticationFailed {
                    reason: e.to_string(),
                })?,
        );
    }

    Ok(AuthenticatedActor::new(actor_id, roles))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require(
        actor: &AuthenticatedActor,
        required: &[Role],
        action: &str,
    ) -> Result<(), AuthError> {
        if has_role(actor, required) {
            Ok(())
        } else {
            let required_role = required
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(" or ");
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role,
            })
        }
    }

    /// Admin-only: draft session review, open, delete, edit, generate.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_manage_sessions(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Admin], "manage_sessions")
    }

    /// Admin or coordinator: purchase order listing and lifecycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor holds neither role.
    pub fn authorize_manage_purchase_orders(
        actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Self::require(
            actor,
            &[Role::Admin, Role::Coordinator],
            "manage_purchase_orders",
        )
    }

    /// Admin-only: monthly billing generation, review, and export.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_manage_billing(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Admin], "manage_billing")
    }

    /// Admin-only: time-off review and conflict resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_review_time_off(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Admin], "review_time_off")
    }

    /// Admin-only: profile and funding source administration.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_administer_accounts(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Admin], "administer_accounts")
    }

    /// Admin-only: timecard review and approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_manage_timecards(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Admin], "manage_timecards")
    }

    /// Booking cancellation: the owning parent, or an admin acting on
    /// their behalf.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither the owner nor an admin.
    pub fn authorize_cancel_booking(
        actor: &AuthenticatedActor,
        owning_parent_id: i64,
    ) -> Result<(), AuthError> {
        if actor.user_id == owning_parent_id || has_role(actor, &[Role::Admin]) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("cancel_booking"),
                required_role: String::from("owning parent or admin"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_default_to_parent() {
        let actor = AuthenticatedActor::new(1, Vec::new());
        assert_eq!(actor.roles, vec![Role::Parent]);
    }

    #[test]
    fn test_has_role_any_of() {
        let actor = AuthenticatedActor::new(1, vec![Role::Coordinator]);
        assert!(has_role(&actor, &[Role::Admin, Role::Coordinator]));
        assert!(!has_role(&actor, &[Role::Admin]));
    }

    #[test]
    fn test_admin_gates() {
        let admin = AuthenticatedActor::new(1, vec![Role::Admin]);
        let parent = AuthenticatedActor::new(2, Vec::new());

        assert!(AuthorizationService::authorize_manage_sessions(&admin).is_ok());
        assert!(AuthorizationService::authorize_manage_sessions(&parent).is_err());
        assert!(AuthorizationService::authorize_review_time_off(&parent).is_err());
    }

    #[test]
    fn test_coordinator_can_manage_pos() {
        let coordinator = AuthenticatedActor::new(3, vec![Role::Coordinator]);
        assert!(AuthorizationService::authorize_manage_purchase_orders(&coordinator).is_ok());
        assert!(AuthorizationService::authorize_manage_billing(&coordinator).is_err());
    }

    #[test]
    fn test_cancel_booking_owner_or_admin() {
        let parent = AuthenticatedActor::new(5, Vec::new());
        let admin = AuthenticatedActor::new(1, vec![Role::Admin]);
        let stranger = AuthenticatedActor::new(9, Vec::new());

        assert!(AuthorizationService::authorize_cancel_booking(&parent, 5).is_ok());
        assert!(AuthorizationService::authorize_cancel_booking(&admin, 5).is_ok());
        assert!(AuthorizationService::authorize_cancel_booking(&stranger, 5).is_err());
    }
}
