use thiserror::Error;
use uuid::Uuid;

use crate::{
    entity::{OrderStatus, UserRole},
    error::AppError,
    middleware::auth::AuthUser,
};

/// Who is asking to move an order, relative to that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    SuperAdmin,
    Admin,
    AssignedTechnician,
    Other,
}

impl Actor {
    pub fn resolve(
        user: &AuthUser,
        caller_technician_id: Option<Uuid>,
        order_technician_id: Option<Uuid>,
    ) -> Self {
        match user.role {
            UserRole::SuperAdmin => Actor::SuperAdmin,
            UserRole::Admin => Actor::Admin,
            _ => match (caller_technician_id, order_technician_id) {
                (Some(mine), Some(assigned)) if mine == assigned => Actor::AssignedTechnician,
                _ => Actor::Other,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("not allowed to move this order to {0:?}")]
    Forbidden(OrderStatus),
    #[error("cannot move order from {from:?} to {to:?}")]
    Illegal { from: OrderStatus, to: OrderStatus },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Forbidden(_) => AppError::Unauthorized,
            TransitionError::Illegal { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}

pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Completed | OrderStatus::Cancelled)
}

/// Forward successor of a non-terminal state.
fn successor(status: OrderStatus) -> Option<OrderStatus> {
    match status {
        OrderStatus::PendingPayment => Some(OrderStatus::Paid),
        OrderStatus::Paid => Some(OrderStatus::InProgress),
        OrderStatus::InProgress => Some(OrderStatus::Completed),
        OrderStatus::Completed | OrderStatus::Cancelled => None,
    }
}

pub fn is_legal(from: OrderStatus, to: OrderStatus) -> bool {
    if is_terminal(from) {
        return false;
    }
    to == OrderStatus::Cancelled || successor(from) == Some(to)
}

pub fn authorize_transition(
    actor: Actor,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), TransitionError> {
    let permitted = match to {
        // payment confirmation is manual
        OrderStatus::Paid => actor == Actor::SuperAdmin,
        _ => actor != Actor::Other,
    };
    if !permitted {
        return Err(TransitionError::Forbidden(to));
    }
    if !is_legal(from, to) {
        return Err(TransitionError::Illegal { from, to });
    }
    Ok(())
}

pub fn parse_status(raw: &str) -> Result<OrderStatus, AppError> {
    match raw.trim() {
        "PENDING_PAYMENT" => Ok(OrderStatus::PendingPayment),
        "PAID" => Ok(OrderStatus::Paid),
        "IN_PROGRESS" => Ok(OrderStatus::InProgress),
        "COMPLETED" => Ok(OrderStatus::Completed),
        "CANCELLED" => Ok(OrderStatus::Cancelled),
        other => Err(AppError::validation(format!("status: unknown order status '{other}'"))),
    }
}
