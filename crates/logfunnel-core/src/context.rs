//! Trusted identity types extracted from a verified signed request.
//!
//! A [`TrustedContext`] is only ever produced by successful envelope
//! verification; handlers never construct one from untrusted input
//! directly. [`UserMetadata`] is the flattened identity object attached to
//! every enriched event under `data.user`.

use serde::{Deserialize, Serialize};

/// Authenticated identity and organization data from a verified envelope.
///
/// Both sub-objects are optional at the wire level; the normalizer rejects
/// a context that lacks either one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedContext {
    /// The authenticated user, when present in the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserContext>,
    /// The user's organization, when present in the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationContext>,
}

/// User identity fields carried in the signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// User email address.
    pub email: String,
    /// Role identifier within the organization.
    pub role_id: String,
    /// Display name.
    pub user_name: String,
    /// Stable user identifier.
    pub user_id: String,
}

/// Organization fields carried in the signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationContext {
    /// Organization display name.
    pub name: String,
    /// Stable organization identifier.
    #[serde(rename = "organizationId")]
    pub organization_id: String,
}

/// Identity object merged into each event's `data.user` field.
///
/// Sourced from the trusted context plus the caller's network address.
/// Overwrites any `data.user` value the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    /// User email address.
    pub email: String,
    /// Role identifier.
    pub role_id: String,
    /// Display name.
    pub username: String,
    /// Stable user identifier.
    pub user_id: String,
    /// Organization display name.
    pub org_name: String,
    /// Stable organization identifier.
    pub org_id: String,
    /// Caller IP as seen by the transport layer.
    pub ip: String,
}

impl UserMetadata {
    /// Builds the identity object from verified context parts and the
    /// caller's address.
    pub fn from_context(
        user: &UserContext,
        organization: &OrganizationContext,
        caller_ip: &str,
    ) -> Self {
        Self {
            email: user.email.clone(),
            role_id: user.role_id.clone(),
            username: user.user_name.clone(),
            user_id: user.user_id.clone(),
            org_name: organization.name.clone(),
            org_id: organization.organization_id.clone(),
            ip: caller_ip.to_string(),
        }
    }
}
