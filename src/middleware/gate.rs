//! Page-level access gate for dashboard and commerce paths.
//!
//! API routes under `/api` are not covered here; each API handler checks
//! the session itself through [`AuthUser`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    entity::{MitraStatus, UserRole},
    middleware::auth::{AuthUser, optional_principal},
    state::AppState,
};

pub const LOGIN_PAGE: &str = "/login";
pub const DASHBOARD: &str = "/dashboard";
pub const CUSTOMER_DASHBOARD: &str = "/dashboard/customer";
pub const ADMIN_DASHBOARD: &str = "/dashboard/admin";
pub const MITRA_DASHBOARD: &str = "/dashboard/mitra";
pub const MITRA_PENDING_PAGE: &str = "/dashboard/mitra/pending";
const CART: &str = "/cart";
const CHECKOUT: &str = "/checkout";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// `path` equals `prefix` or continues it with a new segment.
fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn is_commerce(path: &str) -> bool {
    under(path, CART) || under(path, CHECKOUT)
}

fn requires_auth(path: &str) -> bool {
    under(path, ADMIN_DASHBOARD) || under(path, MITRA_DASHBOARD) || is_commerce(path)
}

/// Rules are evaluated in order; the first match wins.
pub fn evaluate(principal: Option<&AuthUser>, path: &str) -> GateDecision {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    let Some(user) = principal else {
        if requires_auth(path) {
            return GateDecision::Redirect(LOGIN_PAGE);
        }
        if path == DASHBOARD {
            return GateDecision::Redirect(CUSTOMER_DASHBOARD);
        }
        return GateDecision::Allow;
    };

    let on_pending_page = under(path, MITRA_PENDING_PAGE);
    let in_mitra_area = under(path, MITRA_DASHBOARD) && !on_pending_page;
    let is_mitra = user.role == UserRole::Mitra;

    if is_mitra && user.mitra_status == Some(MitraStatus::Pending) && in_mitra_area {
        return GateDecision::Redirect(MITRA_PENDING_PAGE);
    }
    if is_mitra && user.mitra_status == Some(MitraStatus::Approved) && on_pending_page {
        return GateDecision::Redirect(CUSTOMER_DASHBOARD);
    }
    if under(path, ADMIN_DASHBOARD) && !user.is_admin() {
        return GateDecision::Redirect(CUSTOMER_DASHBOARD);
    }
    if in_mitra_area && !is_mitra {
        return GateDecision::Redirect(if user.is_admin() {
            ADMIN_DASHBOARD
        } else {
            CUSTOMER_DASHBOARD
        });
    }
    if is_commerce(path) && user.is_admin() {
        return GateDecision::Redirect(ADMIN_DASHBOARD);
    }
    if is_commerce(path) && is_mitra {
        return GateDecision::Redirect(MITRA_PENDING_PAGE);
    }

    GateDecision::Allow
}

pub async fn page_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if under(&path, "/api") {
        return next.run(request).await;
    }

    let principal = optional_principal(request.headers(), &state.session.secret);
    match evaluate(principal.as_ref(), &path) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(to) => {
            tracing::debug!(path = %path, to, "page gate redirect");
            Redirect::to(to).into_response()
        }
    }
}
