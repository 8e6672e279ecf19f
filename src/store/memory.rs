//! In-process store used by tests and local development.
//!
//! Documents live in ordered maps behind a single `&mut` borrow, so each
//! trait method is trivially atomic. Ordering mirrors the Redis indexes:
//! blogs by creation time (and by like counter), users by creation time.

use std::collections::BTreeMap;

use crate::errors::StoreError;
use crate::id::interaction_id;
use crate::models::{Blog, BlogInteraction, InteractionFlag, User, UserProfile};
use crate::page::{Page, PageRequest};
use crate::search;
use crate::store::{BlogOrder, BlogPatch, BlogStore, FollowChange};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: BTreeMap<String, User>,
    blogs: BTreeMap<String, Blog>,
    interactions: BTreeMap<String, BlogInteraction>,
    profiles: BTreeMap<String, UserProfile>,
    /// email -> user id, the unique-email guard.
    emails: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn blogs_newest_first(&self) -> Vec<&Blog> {
        let mut blogs: Vec<&Blog> = self.blogs.values().collect();
        blogs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        blogs
    }

    fn blogs_most_liked_first(&self) -> Vec<&Blog> {
        let mut blogs: Vec<&Blog> = self.blogs.values().collect();
        blogs.sort_by(|a, b| {
            b.total_likes
                .cmp(&a.total_likes)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        blogs
    }

    fn page_from<T: Clone>(items: Vec<&T>, request: &PageRequest) -> Result<Page<T>, StoreError> {
        let offset = request.offset()?;
        let limit = request.limit();
        let total = items.len() as u64;
        let window: Vec<T> = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(Page::from_slice(window, offset, total))
    }
}

impl BlogStore for MemoryStore {
    async fn insert_user(&mut self, user: User) -> Result<(), StoreError> {
        let email = user.email.to_lowercase();
        if self.emails.contains_key(&email) {
            return Err(StoreError::UniqueViolation {
                field: "email".to_string(),
                value: user.email,
            });
        }
        self.emails.insert(email, user.id.clone());
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn user(&mut self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(user_id).cloned())
    }

    async fn email_exists(&mut self, email: &str) -> Result<bool, StoreError> {
        Ok(self.emails.contains_key(&email.to_lowercase()))
    }

    async fn page_users(&mut self, request: &PageRequest) -> Result<Page<User>, StoreError> {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self::page_from(users, request)
    }

    async fn set_user_profile_image(&mut self, user_id: &str, image_url: &str) -> Result<(), StoreError> {
        let user = self.users.get_mut(user_id).ok_or_else(|| StoreError::Missing {
            key: Some(user_id.to_string()),
        })?;
        user.custom_profile_picture = Some(image_url.to_string());
        Ok(())
    }

    async fn apply_follow(
        &mut self,
        follower_id: &str,
        followee_id: &str,
        change: FollowChange,
    ) -> Result<bool, StoreError> {
        for id in [follower_id, followee_id] {
            if !self.users.contains_key(id) {
                return Err(StoreError::Missing {
                    key: Some(id.to_string()),
                });
            }
        }

        let already_linked = self.users[follower_id]
            .following
            .iter()
            .any(|id| id == followee_id);

        let changed = match change {
            FollowChange::Link if !already_linked => {
                self.users
                    .get_mut(follower_id)
                    .map(|u| u.following.push(followee_id.to_string()));
                self.users
                    .get_mut(followee_id)
                    .map(|u| u.followers.push(follower_id.to_string()));
                true
            }
            FollowChange::Unlink if already_linked => {
                self.users
                    .get_mut(follower_id)
                    .map(|u| u.following.retain(|id| id != followee_id));
                self.users
                    .get_mut(followee_id)
                    .map(|u| u.followers.retain(|id| id != follower_id));
                true
            }
            _ => false,
        };
        Ok(changed)
    }

    async fn insert_blog(&mut self, blog: Blog) -> Result<(), StoreError> {
        self.blogs.insert(blog.id.clone(), blog);
        Ok(())
    }

    async fn blog(&mut self, blog_id: &str) -> Result<Option<Blog>, StoreError> {
        Ok(self.blogs.get(blog_id).cloned())
    }

    async fn patch_blog(&mut self, blog_id: &str, patch: BlogPatch) -> Result<Blog, StoreError> {
        let blog = self.blogs.get_mut(blog_id).ok_or_else(|| StoreError::Missing {
            key: Some(blog_id.to_string()),
        })?;
        blog.name = patch.name;
        blog.content = patch.content;
        blog.image = patch.image;
        blog.image_url = patch.image_url;
        blog.updated_at = Some(patch.updated_at);
        Ok(blog.clone())
    }

    async fn delete_blog(&mut self, blog_id: &str) -> Result<Blog, StoreError> {
        self.blogs.remove(blog_id).ok_or_else(|| StoreError::Missing {
            key: Some(blog_id.to_string()),
        })
    }

    async fn all_blogs(&mut self) -> Result<Vec<Blog>, StoreError> {
        Ok(self.blogs_newest_first().into_iter().cloned().collect())
    }

    async fn page_blogs(&mut self, order: BlogOrder, request: &PageRequest) -> Result<Page<Blog>, StoreError> {
        let blogs = match order {
            BlogOrder::Newest => self.blogs_newest_first(),
            BlogOrder::MostLiked => self.blogs_most_liked_first(),
        };
        Self::page_from(blogs, request)
    }

    async fn blogs_by_author(&mut self, author_id: &str) -> Result<Vec<Blog>, StoreError> {
        Ok(self
            .blogs_newest_first()
            .into_iter()
            .filter(|blog| blog.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn search_blogs(&mut self, term: &str) -> Result<Vec<Blog>, StoreError> {
        let normalized = search::normalize_term(term);
        let matches = self
            .blogs
            .values()
            .filter_map(|blog| search::rank_match(blog, &normalized).map(|rank| (rank, blog.clone())))
            .collect();
        Ok(search::order_matches(matches))
    }

    async fn interaction(&mut self, user_id: &str, blog_id: &str) -> Result<Option<BlogInteraction>, StoreError> {
        Ok(self.interactions.get(&interaction_id(user_id, blog_id)).cloned())
    }

    async fn set_interaction_flag(
        &mut self,
        user_id: &str,
        blog_id: &str,
        flag: InteractionFlag,
        engaged: bool,
    ) -> Result<bool, StoreError> {
        let blog = self.blogs.get_mut(blog_id).ok_or_else(|| StoreError::Missing {
            key: Some(blog_id.to_string()),
        })?;

        let key = interaction_id(user_id, blog_id);
        if !self.interactions.contains_key(&key) && !engaged {
            // Records come into being on first engagement only.
            return Ok(false);
        }
        let record = self
            .interactions
            .entry(key)
            .or_insert_with(|| BlogInteraction::new(user_id, blog_id));

        let slot = match flag {
            InteractionFlag::Liked => &mut record.is_liked,
            InteractionFlag::Saved => &mut record.is_saved,
        };
        if *slot == engaged {
            return Ok(false);
        }
        *slot = engaged;

        let counter = match flag {
            InteractionFlag::Liked => &mut blog.total_likes,
            InteractionFlag::Saved => &mut blog.total_saved,
        };
        if engaged {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
        Ok(true)
    }

    async fn interactions_by_user(&mut self, user_id: &str) -> Result<Vec<BlogInteraction>, StoreError> {
        Ok(self
            .interactions
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_profile(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn put_profile(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        if !self.profiles.contains_key(&profile.id) {
            return Err(StoreError::Missing {
                key: Some(profile.id.clone()),
            });
        }
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn profile(&mut self, profile_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.get(profile_id).cloned())
    }

    async fn profile_for_user(&mut self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .profiles
            .values()
            .find(|profile| profile.existing_user_id.as_deref() == Some(user_id))
            .cloned())
    }
}
