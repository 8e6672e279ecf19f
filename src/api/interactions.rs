//! Like/save mutations and the listings derived from the interaction table.

use crate::errors::AppError;
use crate::models::{Blog, BlogInteraction, InteractionFlag};
use crate::session::{Session, require_session};
use crate::store::BlogStore;

async fn engage(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    blog_id: &str,
    flag: InteractionFlag,
    engaged: bool,
) -> Result<(), AppError> {
    let user_id = require_session(session)?.to_string();
    if store.user(&user_id).await?.is_none() {
        return Err(AppError::not_found("User"));
    }
    if store.blog(blog_id).await?.is_none() {
        return Err(AppError::not_found("Blog"));
    }
    // Redundant transitions (liking twice, unliking without a like) are
    // no-ops inside the store call.
    store.set_interaction_flag(&user_id, blog_id, flag, engaged).await?;
    Ok(())
}

pub async fn like_blog(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    blog_id: &str,
) -> Result<(), AppError> {
    engage(store, session, blog_id, InteractionFlag::Liked, true).await
}

pub async fn unlike_blog(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    blog_id: &str,
) -> Result<(), AppError> {
    engage(store, session, blog_id, InteractionFlag::Liked, false).await
}

pub async fn save_blog(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    blog_id: &str,
) -> Result<(), AppError> {
    engage(store, session, blog_id, InteractionFlag::Saved, true).await
}

pub async fn unsave_blog(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    blog_id: &str,
) -> Result<(), AppError> {
    engage(store, session, blog_id, InteractionFlag::Saved, false).await
}

/// The interaction record for a `(user, blog)` pair, if the user ever
/// engaged with the blog.
pub async fn get_blog_interaction(
    store: &mut impl BlogStore,
    user_id: &str,
    blog_id: &str,
) -> Result<Option<BlogInteraction>, AppError> {
    Ok(store.interaction(user_id, blog_id).await?)
}

async fn engaged_blogs(
    store: &mut impl BlogStore,
    user_id: &str,
    flag: InteractionFlag,
) -> Result<Vec<Blog>, AppError> {
    let records = store.interactions_by_user(user_id).await?;
    let mut blogs = Vec::new();
    for record in records {
        let engaged = match flag {
            InteractionFlag::Liked => record.is_liked,
            InteractionFlag::Saved => record.is_saved,
        };
        if !engaged {
            continue;
        }
        // Interaction records outlive blog deletion; skip the dangling ones.
        if let Some(blog) = store.blog(&record.blog_id).await? {
            blogs.push(blog);
        }
    }
    blogs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    Ok(blogs)
}

/// Blogs the user currently likes, newest first.
pub async fn get_liked_blogs(store: &mut impl BlogStore, user_id: &str) -> Result<Vec<Blog>, AppError> {
    engaged_blogs(store, user_id, InteractionFlag::Liked).await
}

/// Blogs the user currently has saved, newest first.
pub async fn get_saved_blogs(store: &mut impl BlogStore, user_id: &str) -> Result<Vec<Blog>, AppError> {
    engaged_blogs(store, user_id, InteractionFlag::Saved).await
}
