//! Staff and client directory types.

use uuid::Uuid;

use super::status::StaffRole;

/// An internal user: notification recipient and workflow actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    /// Primary identifier.
    pub id: Uuid,
    /// Login and contact address.
    pub email: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Role controlling fan-out membership and permissions.
    pub role: StaffRole,
    /// Inactive staff neither log in nor receive notifications.
    pub is_active: bool,
}

/// A client organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Primary identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact address for workflow emails; clients without one are
    /// silently skipped by best-effort email steps.
    pub email: Option<String>,
    /// SHA-256 digest of the active portal access token, if any. The token
    /// itself is never stored.
    pub portal_token_digest: Option<String>,
}

/// Credentials presented to the staff login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Staff email address.
    pub email: String,
    /// Plain-text password, verified against the stored hash.
    pub password: String,
}
