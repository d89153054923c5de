use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A profile owner as returned by the user endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar_ref: Option<String>,
    /// True when this user is the signed-in viewer
    #[serde(default)]
    pub is_current_user: bool,
}

/// Cached social metadata for one user. A `None` field means "unknown, fetch it".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAttributes {
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub follow_status: Option<bool>,
}

impl SocialAttributes {
    /// Both counts, only when both are known
    pub fn counts(&self) -> Option<(u64, u64)> {
        match (self.followers_count, self.following_count) {
            (Some(followers), Some(following)) => Some((followers, following)),
            _ => None,
        }
    }
}

/// A single feed item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub created_at: i64,
}

/// Follow relationship between the viewer and the profile owner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FollowRelationship {
    #[default]
    Unknown,
    Following,
    NotFollowing,
}

impl FollowRelationship {
    pub fn is_following(&self) -> bool {
        matches!(self, FollowRelationship::Following)
    }
}

impl From<bool> for FollowRelationship {
    fn from(following: bool) -> Self {
        if following {
            FollowRelationship::Following
        } else {
            FollowRelationship::NotFollowing
        }
    }
}

/// Which side of the social graph a followers list shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowType {
    Followers,
    Following,
}

impl FollowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowType::Followers => "followers",
            FollowType::Following => "following",
        }
    }
}

impl fmt::Display for FollowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers" => Ok(FollowType::Followers),
            "following" => Ok(FollowType::Following),
            other => Err(format!("Unknown follow type: {}", other)),
        }
    }
}
