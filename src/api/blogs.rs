//! Blog lifecycle and listing queries.

use url::Url;

use crate::blobs::{BlobStore, UploadGrant};
use crate::errors::{AppError, ValidationError, ValidationIssue};
use crate::id::generate_entity_id;
use crate::models::Blog;
use crate::page::{Page, PageRequest};
use crate::session::{Session, require_session};
use crate::store::{BlogOrder, BlogPatch, BlogStore, now};

/// Input for a new post. `image` is a blob storage id, `image_url` an
/// externally hosted alternative.
#[derive(Debug, Clone, Default)]
pub struct NewBlog {
    pub name: String,
    pub content: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

/// Replacement values for an edit; author stamps are never editable.
#[derive(Debug, Clone, Default)]
pub struct BlogEdit {
    pub name: String,
    pub content: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

fn validate_blog_fields(name: &str, content: &str, image_url: Option<&str>) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    if name.trim().is_empty() {
        issues.push(ValidationIssue::new("name", "required", "title must not be empty"));
    }
    if content.trim().is_empty() {
        issues.push(ValidationIssue::new("content", "required", "content must not be empty"));
    }
    if let Some(url) = image_url
        && Url::parse(url).is_err()
    {
        issues.push(ValidationIssue::new("image_url", "invalid", "not a valid URL"));
    }
    if issues.is_empty() { Ok(()) } else { Err(ValidationError::new(issues)) }
}

/// Creates a post authored by the session user. `author_id` and
/// `author_name` are stamped from the current account, never from input.
pub async fn create_blog(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    input: NewBlog,
) -> Result<Blog, AppError> {
    let author_id = require_session(session)?.to_string();
    let author = store
        .user(&author_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    validate_blog_fields(&input.name, &input.content, input.image_url.as_deref())?;
    let blog = Blog {
        id: generate_entity_id(),
        name: input.name,
        content: input.content,
        author_id,
        author_name: author.name,
        image: input.image,
        image_url: input.image_url,
        total_likes: 0,
        total_saved: 0,
        created_at: now(),
        updated_at: None,
    };
    store.insert_blog(blog.clone()).await?;
    Ok(blog)
}

/// Replaces a post's editable fields. Only the author may edit.
pub async fn update_blog(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    blog_id: &str,
    edit: BlogEdit,
) -> Result<Blog, AppError> {
    let actor_id = require_session(session)?;
    let blog = store
        .blog(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    if blog.author_id != actor_id {
        return Err(AppError::unauthorized("Unauthorized to update this blog"));
    }
    validate_blog_fields(&edit.name, &edit.content, edit.image_url.as_deref())?;
    let patch = BlogPatch {
        name: edit.name,
        content: edit.content,
        image: edit.image,
        image_url: edit.image_url,
        updated_at: now(),
    };
    Ok(store.patch_blog(blog_id, patch).await?)
}

/// Deletes a post and its stored image. Only the author may delete.
///
/// The blob goes first and the record second; if the second step fails the
/// record survives with a dangling storage id.
pub async fn remove_blog(
    store: &mut impl BlogStore,
    blobs: &mut impl BlobStore,
    session: Option<&Session>,
    blog_id: &str,
) -> Result<Blog, AppError> {
    let actor_id = require_session(session)?;
    let blog = store
        .blog(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    if blog.author_id != actor_id {
        return Err(AppError::unauthorized("Unauthorized to delete this blog"));
    }
    if let Some(storage_id) = &blog.image {
        blobs.delete(storage_id).await?;
    }
    Ok(store.delete_blog(blog_id).await?)
}

pub async fn get_blog_by_id(store: &mut impl BlogStore, blog_id: &str) -> Result<Option<Blog>, AppError> {
    Ok(store.blog(blog_id).await?)
}

/// Every post, newest first.
pub async fn get_all_blogs(store: &mut impl BlogStore) -> Result<Vec<Blog>, AppError> {
    Ok(store.all_blogs().await?)
}

pub async fn get_blogs_by_author(store: &mut impl BlogStore, author_id: &str) -> Result<Vec<Blog>, AppError> {
    Ok(store.blogs_by_author(author_id).await?)
}

/// Creation order, newest first.
pub async fn get_paginated_blogs(
    store: &mut impl BlogStore,
    request: &PageRequest,
) -> Result<Page<Blog>, AppError> {
    Ok(store.page_blogs(BlogOrder::Newest, request).await?)
}

/// Like-counter order, most liked first.
pub async fn get_popular_blogs(
    store: &mut impl BlogStore,
    request: &PageRequest,
) -> Result<Page<Blog>, AppError> {
    Ok(store.page_blogs(BlogOrder::MostLiked, request).await?)
}

/// Case-insensitive free-text search over titles and content; title matches
/// rank before content-only matches.
pub async fn search_blogs(store: &mut impl BlogStore, term: &str) -> Result<Vec<Blog>, AppError> {
    Ok(store.search_blogs(term).await?)
}

pub async fn total_likes(store: &mut impl BlogStore, blog_id: &str) -> Result<u64, AppError> {
    let blog = store
        .blog(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    Ok(blog.total_likes)
}

pub async fn total_saved(store: &mut impl BlogStore, blog_id: &str) -> Result<u64, AppError> {
    let blog = store
        .blog(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    Ok(blog.total_saved)
}

/// One-time upload grant for a post or profile image.
pub async fn generate_upload_url(
    blobs: &mut impl BlobStore,
    session: Option<&Session>,
) -> Result<UploadGrant, AppError> {
    require_session(session)?;
    Ok(blobs.generate_upload_url().await?)
}
