//! Project membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role of a user on a project. OWNER is implicit, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OWNER" => Some(Self::Owner),
            "ADMIN" => Some(Self::Admin),
            "MEMBER" => Some(Self::Member),
            _ => None,
        }
    }

    /// Owner or admin: may edit the project, regenerate and manage members.
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_invite_role() -> MemberRole {
    MemberRole::Member
}

/// Invite a registered user by email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InviteMemberRequest {
    pub email: String,
    /// ADMIN or MEMBER (default MEMBER)
    #[serde(default = "default_invite_role")]
    pub role: MemberRole,
}

/// Query for member removal.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberQuery {
    pub member_id: Uuid,
}

/// User details inside a member entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// One entry of a project's member list. The owner is listed first with a null id.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    /// Membership id; `None` for the owner
    pub id: Option<Uuid>,
    pub role: MemberRole,
    pub is_owner: bool,
    pub invited_at: Option<DateTime<Utc>>,
    pub user: MemberUser,
}
