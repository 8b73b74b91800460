use halotekno_api::{
    entity::{OrderStatus, UserRole},
    error::AppError,
    middleware::auth::AuthUser,
    services::order_status::{
        Actor, TransitionError, authorize_transition, is_legal, is_terminal, parse_status,
    },
};
use uuid::Uuid;

use OrderStatus::*;

const ALL: [OrderStatus; 5] = [PendingPayment, Paid, InProgress, Completed, Cancelled];

fn principal(role: UserRole) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role,
        mitra_status: None,
    }
}

#[test]
fn forward_path_is_legal() {
    assert!(is_legal(PendingPayment, Paid));
    assert!(is_legal(Paid, InProgress));
    assert!(is_legal(InProgress, Completed));
}

#[test]
fn skipping_or_going_back_is_illegal() {
    assert!(!is_legal(PendingPayment, InProgress));
    assert!(!is_legal(PendingPayment, Completed));
    assert!(!is_legal(InProgress, Paid));
    assert!(!is_legal(Paid, PendingPayment));
    assert!(!is_legal(Paid, Paid));
}

#[test]
fn any_open_order_can_be_cancelled() {
    for from in [PendingPayment, Paid, InProgress] {
        assert!(is_legal(from, Cancelled), "{from:?} -> Cancelled");
    }
}

#[test]
fn terminal_states_never_move() {
    for from in [Completed, Cancelled] {
        assert!(is_terminal(from));
        for to in ALL {
            assert!(!is_legal(from, to), "{from:?} -> {to:?}");
        }
    }
}

#[test]
fn only_super_admin_confirms_payment() {
    assert_eq!(authorize_transition(Actor::SuperAdmin, PendingPayment, Paid), Ok(()));
    for actor in [Actor::Admin, Actor::AssignedTechnician, Actor::Other] {
        assert_eq!(
            authorize_transition(actor, PendingPayment, Paid),
            Err(TransitionError::Forbidden(Paid)),
            "{actor:?}"
        );
    }
}

#[test]
fn assigned_technician_moves_work_forward() {
    assert_eq!(authorize_transition(Actor::AssignedTechnician, Paid, InProgress), Ok(()));
    assert_eq!(authorize_transition(Actor::AssignedTechnician, InProgress, Completed), Ok(()));
    assert_eq!(authorize_transition(Actor::Admin, InProgress, Completed), Ok(()));
}

#[test]
fn unrelated_caller_is_rejected_before_legality() {
    assert_eq!(
        authorize_transition(Actor::Other, Completed, InProgress),
        Err(TransitionError::Forbidden(InProgress))
    );
}

#[test]
fn illegal_move_by_permitted_actor_is_reported() {
    assert_eq!(
        authorize_transition(Actor::Admin, Completed, Cancelled),
        Err(TransitionError::Illegal {
            from: Completed,
            to: Cancelled
        })
    );
}

#[test]
fn transition_errors_map_to_http_statuses() {
    let forbidden: AppError = TransitionError::Forbidden(Paid).into();
    assert_eq!(forbidden.status(), axum::http::StatusCode::UNAUTHORIZED);
    let illegal: AppError = TransitionError::Illegal {
        from: Completed,
        to: Paid,
    }
    .into();
    assert_eq!(illegal.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[test]
fn actor_resolution() {
    let tech = Uuid::new_v4();
    assert_eq!(
        Actor::resolve(&principal(UserRole::SuperAdmin), None, Some(tech)),
        Actor::SuperAdmin
    );
    assert_eq!(Actor::resolve(&principal(UserRole::Admin), None, None), Actor::Admin);
    assert_eq!(
        Actor::resolve(&principal(UserRole::Customer), Some(tech), Some(tech)),
        Actor::AssignedTechnician
    );
    assert_eq!(
        Actor::resolve(&principal(UserRole::Customer), Some(Uuid::new_v4()), Some(tech)),
        Actor::Other
    );
    assert_eq!(
        Actor::resolve(&principal(UserRole::Customer), Some(tech), None),
        Actor::Other
    );
}

#[test]
fn status_strings_parse_strictly() {
    assert_eq!(parse_status("IN_PROGRESS").ok(), Some(InProgress));
    assert_eq!(parse_status(" PAID ").ok(), Some(Paid));
    assert!(parse_status("paid").is_err());
    assert!(parse_status("SHIPPED").is_err());
}

#[test]
fn assigned_technician_follows_the_transition_table() {
    let tech = Actor::AssignedTechnician;
    assert_eq!(authorize_transition(tech, Paid, InProgress), Ok(()));
    assert_eq!(authorize_transition(tech, InProgress, Completed), Ok(()));
    assert_eq!(authorize_transition(tech, Paid, Cancelled), Ok(()));
    assert_eq!(
        authorize_transition(tech, Paid, Completed),
        Err(TransitionError::Illegal { from: Paid, to: Completed })
    );
}
