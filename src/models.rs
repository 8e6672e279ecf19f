use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access role granted at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    ProUser,
    #[default]
    User,
}

/// Account record: identity, profile fields, and the social graph arrays.
///
/// `following`/`followers` are sets stored as ordered sequences; an id never
/// appears twice in either array. Engagement (likes/saves) lives in the
/// interaction table, not on the user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub custom_profile_picture: Option<String>,
    #[serde(default)]
    pub profile_image_storage_id: Option<String>,
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub followers: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.iter().any(|id| id == user_id)
    }
}

/// A post. `content` is raw HTML under a trusted-author model; it is stored
/// and returned verbatim.
///
/// `total_likes`/`total_saved` are denormalized counters maintained in the
/// same store call as the interaction-flag write, and never drop below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    /// Title of the blog.
    pub name: String,
    pub content: String,
    pub author_id: String,
    /// Author display name, denormalized at creation time.
    pub author_name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_saved: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Join record for a user's engagement with a blog.
///
/// At most one record exists per `(user_id, blog_id)` pair; the same record
/// carries both flags, and unliking flips `is_liked` back to false rather
/// than deleting the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogInteraction {
    pub user_id: String,
    pub blog_id: String,
    pub is_liked: bool,
    pub is_saved: bool,
}

impl BlogInteraction {
    pub fn new(user_id: impl Into<String>, blog_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            blog_id: blog_id.into(),
            is_liked: false,
            is_saved: false,
        }
    }
}

/// Which interaction flag a mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionFlag {
    Liked,
    Saved,
}

impl InteractionFlag {
    pub const fn field(self) -> &'static str {
        match self {
            InteractionFlag::Liked => "is_liked",
            InteractionFlag::Saved => "is_saved",
        }
    }

    /// The blog counter this flag denormalizes into.
    pub const fn counter(self) -> &'static str {
        match self {
            InteractionFlag::Liked => "total_likes",
            InteractionFlag::Saved => "total_saved",
        }
    }
}

/// Extended profile, optional 1:1 with a user, upserted by the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub existing_user_id: Option<String>,
    #[serde(default)]
    pub details: ProfileDetails,
}

/// Free-form extra profile fields; every field is optional and patches
/// merge field-by-field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub add_additional_name: Option<String>,
    #[serde(default)]
    pub add_additional_email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub custom_profile_picture: Option<String>,
}

impl ProfileDetails {
    /// Field-by-field merge: `patch` wins wherever it supplies a value.
    pub fn merged_with(&self, patch: &ProfileDetails) -> ProfileDetails {
        fn pick(patch: &Option<String>, base: &Option<String>) -> Option<String> {
            patch.clone().or_else(|| base.clone())
        }
        ProfileDetails {
            name: pick(&patch.name, &self.name),
            email: pick(&patch.email, &self.email),
            add_additional_name: pick(&patch.add_additional_name, &self.add_additional_name),
            add_additional_email: pick(&patch.add_additional_email, &self.add_additional_email),
            first_name: pick(&patch.first_name, &self.first_name),
            last_name: pick(&patch.last_name, &self.last_name),
            address: pick(&patch.address, &self.address),
            phone_number: pick(&patch.phone_number, &self.phone_number),
            profile_picture: pick(&patch.profile_picture, &self.profile_picture),
            custom_profile_picture: pick(&patch.custom_profile_picture, &self.custom_profile_picture),
        }
    }
}
