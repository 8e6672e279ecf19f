//! Document-store seam.
//!
//! `BlogStore` is the contract the query/mutation surface is written
//! against. Every method is one store call: reads and writes performed
//! inside a single method are serialized by the implementation (a Lua
//! script in the Redis store, one mutable borrow in the memory store), so
//! paired updates such as interaction-flag + counter or
//! follower + following never interleave with other calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::models::{Blog, BlogInteraction, InteractionFlag, User, UserProfile};
use crate::page::{Page, PageRequest};

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Direction of a follow-graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowChange {
    Link,
    Unlink,
}

/// Index a blog listing pages over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogOrder {
    /// Creation order, newest first.
    Newest,
    /// Denormalized like counter, highest first.
    MostLiked,
}

/// Full replacement of a blog's editable fields, stamped with the edit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPatch {
    pub name: String,
    pub content: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[allow(async_fn_in_trait)]
pub trait BlogStore {
    // -- users --

    /// Inserts a new user. Fails with `UniqueViolation` if the email is taken.
    async fn insert_user(&mut self, user: User) -> Result<(), StoreError>;
    async fn user(&mut self, user_id: &str) -> Result<Option<User>, StoreError>;
    async fn email_exists(&mut self, email: &str) -> Result<bool, StoreError>;
    /// Creation order, oldest first.
    async fn page_users(&mut self, request: &PageRequest) -> Result<Page<User>, StoreError>;
    async fn set_user_profile_image(&mut self, user_id: &str, image_url: &str) -> Result<(), StoreError>;

    /// Applies a follow-graph change to both user documents in one call:
    /// the target is appended to / removed from the follower's `following`
    /// and the follower from the target's `followers`. Membership is
    /// re-checked inside the call, so a duplicate link or a redundant
    /// unlink is reported as `Ok(false)` without modifying either array.
    async fn apply_follow(
        &mut self,
        follower_id: &str,
        followee_id: &str,
        change: FollowChange,
    ) -> Result<bool, StoreError>;

    // -- blogs --

    async fn insert_blog(&mut self, blog: Blog) -> Result<(), StoreError>;
    async fn blog(&mut self, blog_id: &str) -> Result<Option<Blog>, StoreError>;
    async fn patch_blog(&mut self, blog_id: &str, patch: BlogPatch) -> Result<Blog, StoreError>;
    /// Removes the blog document and its index entries, returning the
    /// deleted document. Interaction records referencing it are kept;
    /// liked/saved listings drop blogs that no longer resolve.
    async fn delete_blog(&mut self, blog_id: &str) -> Result<Blog, StoreError>;
    /// Every blog, newest first.
    async fn all_blogs(&mut self) -> Result<Vec<Blog>, StoreError>;
    async fn page_blogs(&mut self, order: BlogOrder, request: &PageRequest) -> Result<Page<Blog>, StoreError>;
    async fn blogs_by_author(&mut self, author_id: &str) -> Result<Vec<Blog>, StoreError>;
    /// Full match set for a free-text term (see `crate::search` for the
    /// match and ordering contract).
    async fn search_blogs(&mut self, term: &str) -> Result<Vec<Blog>, StoreError>;

    // -- interactions --

    async fn interaction(&mut self, user_id: &str, blog_id: &str) -> Result<Option<BlogInteraction>, StoreError>;

    /// Sets one interaction flag for a `(user, blog)` pair, creating the
    /// record on first engagement, and adjusts the blog's denormalized
    /// counter in the same call. The counter is clamped at zero. Returns
    /// whether the flag actually changed; setting an already-set flag is a
    /// no-op. Fails with `Missing` when the blog does not exist.
    async fn set_interaction_flag(
        &mut self,
        user_id: &str,
        blog_id: &str,
        flag: InteractionFlag,
        engaged: bool,
    ) -> Result<bool, StoreError>;

    /// All interaction records for a user, via the per-user index.
    async fn interactions_by_user(&mut self, user_id: &str) -> Result<Vec<BlogInteraction>, StoreError>;

    // -- extended profiles --

    async fn insert_profile(&mut self, profile: UserProfile) -> Result<(), StoreError>;
    /// Overwrites an existing profile document.
    async fn put_profile(&mut self, profile: UserProfile) -> Result<(), StoreError>;
    async fn profile(&mut self, profile_id: &str) -> Result<Option<UserProfile>, StoreError>;
    async fn profile_for_user(&mut self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;
}

/// Stamp for edits; wrapped so stores and the api layer agree on the clock.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
