//! Authorization policy
//!
//! Every role check in the service goes through [`authorize`]. Handlers state
//! what they are about to do and to which resource; the policy answers.

use shared::error::{AppError, ErrorCode};
use shared::models::Role;

use super::CurrentUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewOrder,
    ConfirmOrder,
    RejectOrder,
    ListAllOrders,
    ManageCatalog,
    ManageUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A single order, identified by its owner
    Order { owner_id: i64 },
    /// Every order in the shop
    AllOrders,
    Catalog,
    /// The user list
    Users,
    /// A single account
    User { user_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Valid role, but the order belongs to someone else
    NotOwner,
    /// The action is reserved to ADMIN/MANAGER
    StaffOnly,
    AdminOnly,
    /// Admins cannot edit or delete their own account through the admin API
    SelfModification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turn a deny into the matching 403 error
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotOwner) => Err(AppError::permission_denied(
                "Vous n'avez pas accès à cette commande",
            )),
            Decision::Deny(DenyReason::StaffOnly) => Err(AppError::forbidden()),
            Decision::Deny(DenyReason::AdminOnly) => Err(AppError::new(ErrorCode::AdminRequired)),
            Decision::Deny(DenyReason::SelfModification) => {
                Err(AppError::new(ErrorCode::CannotModifySelf))
            }
        }
    }
}

/// Decide whether `actor` may perform `action` on `resource`
pub fn authorize(actor: &CurrentUser, action: Action, resource: Resource) -> Decision {
    use Decision::{Allow, Deny};

    match action {
        Action::ViewOrder | Action::ConfirmOrder => match resource {
            _ if actor.role.is_staff() => Allow,
            Resource::Order { owner_id } if owner_id == actor.id => Allow,
            _ => Deny(DenyReason::NotOwner),
        },
        Action::RejectOrder | Action::ListAllOrders => {
            if actor.role.is_staff() {
                Allow
            } else {
                Deny(DenyReason::StaffOnly)
            }
        }
        Action::ManageCatalog => {
            if actor.role == Role::Admin {
                Allow
            } else {
                Deny(DenyReason::AdminOnly)
            }
        }
        Action::ManageUsers => match resource {
            _ if actor.role != Role::Admin => Deny(DenyReason::AdminOnly),
            Resource::User { user_id } if user_id == actor.id => {
                Deny(DenyReason::SelfModification)
            }
            _ => Allow,
        },
    }
}
