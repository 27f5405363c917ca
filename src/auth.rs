//! # Authentication Context
//!
//! Tenant resolution and role authorization happen upstream of this service;
//! requests arrive with `x-tenant-id`, `x-user-id` and `x-role` headers
//! already resolved by the gateway. This module validates those headers once
//! per request and threads the result through as an [`AuthContext`]. Absent
//! or malformed context is rejected, never defaulted.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, unauthorized};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-role";

/// Tenant ID wrapper for type safety
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantId(pub Uuid);

/// Closed set of capabilities a principal can hold within a tenant.
///
/// Resolved once per request from the gateway-supplied role header; the
/// booking engine receives this value and never re-derives roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// May book and cancel their own appointments.
    Client,
    /// May manage their own calendar and act on their own appointments.
    Staff,
    /// May act on any appointment and calendar within the tenant.
    Admin,
}

impl Capability {
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "client" => Some(Capability::Client),
            "staff" => Some(Capability::Staff),
            "admin" => Some(Capability::Admin),
            _ => None,
        }
    }

    pub fn is_staff_side(self) -> bool {
        matches!(self, Capability::Staff | Capability::Admin)
    }
}

/// Authenticated request context resolved by the upstream gateway.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub tenant_id: TenantId,
    pub user_id: Uuid,
    pub capability: Capability,
}

impl AuthContext {
    /// Whether this principal may act on the calendar of `staff_id`.
    /// Staff are confined to their own calendar; admins cover the tenant.
    pub fn may_act_for_staff(&self, staff_id: Uuid) -> bool {
        match self.capability {
            Capability::Admin => true,
            Capability::Staff => self.user_id == staff_id,
            Capability::Client => false,
        }
    }
}

/// Middleware that validates the resolved-context headers and stores an
/// [`AuthContext`] in request extensions for extraction by handlers.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let context = context_from_headers(request.headers())?;

    tracing::debug!(
        tenant_id = %context.tenant_id.0,
        user_id = %context.user_id,
        capability = ?context.capability,
        "Resolved request auth context"
    );

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

fn context_from_headers(headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let tenant_id = parse_uuid_header(headers, TENANT_HEADER)?;
    let user_id = parse_uuid_header(headers, USER_HEADER)?;

    let role = headers
        .get(ROLE_HEADER)
        .ok_or_else(|| unauthorized(Some("Missing x-role header")))?
        .to_str()
        .map_err(|_| unauthorized(Some("Invalid x-role header")))?;

    let capability = Capability::from_role(role)
        .ok_or_else(|| unauthorized(Some("Unknown role in x-role header")))?;

    Ok(AuthContext {
        tenant_id: TenantId(tenant_id),
        user_id,
        capability,
    })
}

fn parse_uuid_header(headers: &HeaderMap, name: &'static str) -> Result<Uuid, ApiError> {
    headers
        .get(name)
        .ok_or_else(|| unauthorized(Some(&format!("Missing {name} header"))))?
        .to_str()
        .ok()
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| unauthorized(Some(&format!("Invalid {name} header"))))
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| unauthorized(Some("Request context not resolved")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(tenant: &str, user: &str, role: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(TENANT_HEADER, HeaderValue::from_str(tenant).unwrap());
        map.insert(USER_HEADER, HeaderValue::from_str(user).unwrap());
        map.insert(ROLE_HEADER, HeaderValue::from_str(role).unwrap());
        map
    }

    #[test]
    fn resolves_full_context() {
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();
        let ctx =
            context_from_headers(&headers(&tenant.to_string(), &user.to_string(), "staff"))
                .expect("context resolves");

        assert_eq!(ctx.tenant_id.0, tenant);
        assert_eq!(ctx.user_id, user);
        assert_eq!(ctx.capability, Capability::Staff);
    }

    #[test]
    fn missing_tenant_header_is_rejected() {
        let mut map = HeaderMap::new();
        map.insert(USER_HEADER, HeaderValue::from_static("not-used"));
        assert!(context_from_headers(&map).is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let tenant = Uuid::new_v4().to_string();
        let user = Uuid::new_v4().to_string();
        assert!(context_from_headers(&headers(&tenant, &user, "superuser")).is_err());
    }

    #[test]
    fn staff_capability_is_scoped_to_own_calendar() {
        let staff_id = Uuid::new_v4();
        let ctx = AuthContext {
            tenant_id: TenantId(Uuid::new_v4()),
            user_id: staff_id,
            capability: Capability::Staff,
        };

        assert!(ctx.may_act_for_staff(staff_id));
        assert!(!ctx.may_act_for_staff(Uuid::new_v4()));
    }

    #[test]
    fn admin_capability_covers_the_tenant() {
        let ctx = AuthContext {
            tenant_id: TenantId(Uuid::new_v4()),
            user_id: Uuid::new_v4(),
            capability: Capability::Admin,
        };
        assert!(ctx.may_act_for_staff(Uuid::new_v4()));
    }

    #[test]
    fn client_capability_never_acts_for_staff() {
        let ctx = AuthContext {
            tenant_id: TenantId(Uuid::new_v4()),
            user_id: Uuid::new_v4(),
            capability: Capability::Client,
        };
        assert!(!ctx.may_act_for_staff(ctx.user_id));
    }
}
