//! Ownership and role policy.
//!
//! The policy is a pure function of the acting user, their roles, and the
//! owner of the resource. Services call it before every edit or delete,
//! including on the request that renders an edit form, and again on the
//! request that commits the change.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{Error, UserId};

/// Roles recognised by the forum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// An authenticated caller together with their role memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    roles: BTreeSet<Role>,
}

impl Actor {
    pub fn new(user_id: UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
        }
    }

    /// A member with no roles.
    pub fn member(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: BTreeSet::new(),
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, [Role::Admin])
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Whether `actor_id` holding `actor_roles` may edit or delete a resource
/// owned by `owner_id`.
///
/// # Examples
/// ```
/// use homecraft::domain::{Role, UserId, can_modify};
///
/// let owner = UserId::random();
/// let other = UserId::random();
/// assert!(can_modify(&owner, &[], &owner));
/// assert!(!can_modify(&other, &[], &owner));
/// assert!(can_modify(&other, &[Role::Admin], &owner));
/// ```
pub fn can_modify(actor_id: &UserId, actor_roles: &[Role], owner_id: &UserId) -> bool {
    actor_id == owner_id || actor_roles.contains(&Role::Admin)
}

/// Fail with `forbidden` unless `actor` may modify a resource owned by
/// `owner_id`.
pub fn ensure_can_modify(actor: &Actor, owner_id: &UserId, resource: &str) -> Result<(), Error> {
    let roles: Vec<Role> = actor.roles().collect();
    if can_modify(actor.user_id(), &roles, owner_id) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "only the owner or an administrator may modify this {resource}"
        )))
    }
}

/// Fail with `forbidden` unless `actor` is an administrator.
pub fn ensure_admin(actor: &Actor) -> Result<(), Error> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("administrator role required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[derive(Clone, Copy)]
    enum Who {
        Owner,
        Stranger,
    }

    #[rstest]
    #[case(Who::Owner, &[], true)]
    #[case(Who::Owner, &[Role::Admin], true)]
    #[case(Who::Stranger, &[], false)]
    #[case(Who::Stranger, &[Role::Admin], true)]
    fn owner_or_admin_may_modify(
        #[case] who: Who,
        #[case] roles: &[Role],
        #[case] expected: bool,
    ) {
        let owner = UserId::random();
        let actor = match who {
            Who::Owner => owner,
            Who::Stranger => UserId::random(),
        };
        assert_eq!(can_modify(&actor, roles, &owner), expected);
    }

    #[test]
    fn denial_is_forbidden_not_not_found() {
        let owner = UserId::random();
        let err = ensure_can_modify(&Actor::member(UserId::random()), &owner, "topic")
            .expect_err("stranger must be denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn ensure_admin_rejects_members() {
        assert!(ensure_admin(&Actor::admin(UserId::random())).is_ok());
        let err = ensure_admin(&Actor::member(UserId::random())).expect_err("member denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn role_names_round_trip_through_storage_text() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("Moderator".parse::<Role>().is_err());
    }
}
