//! Account registration, lookups, and the follow graph.

use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;
use url::Url;

use crate::errors::{AppError, StoreError, ValidationError, ValidationIssue};
use crate::id::generate_entity_id;
use crate::models::{Role, User};
use crate::page::{Page, PageRequest};
use crate::session::{Session, require_session};
use crate::store::{BlogStore, FollowChange, now};

static MOBILE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-()]{6,19}$").unwrap());

/// Sign-up input. Role defaults to the plain user tier.
#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub user_name: Option<String>,
    pub contact_email: Option<String>,
    pub age: Option<u32>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
}

fn validate_registration(input: &RegisterUser) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    if input.name.trim().is_empty() {
        issues.push(ValidationIssue::new("name", "required", "name must not be empty"));
    }
    if !EmailAddress::is_valid(&input.email) {
        issues.push(ValidationIssue::new("email", "invalid", "not a valid email address"));
    }
    if let Some(contact) = &input.contact_email
        && !EmailAddress::is_valid(contact)
    {
        issues.push(ValidationIssue::new(
            "contact_email",
            "invalid",
            "not a valid email address",
        ));
    }
    if let Some(number) = &input.mobile_number
        && !MOBILE_NUMBER.is_match(number)
    {
        issues.push(ValidationIssue::new(
            "mobile_number",
            "invalid",
            "not a plausible phone number",
        ));
    }
    if issues.is_empty() { Ok(()) } else { Err(ValidationError::new(issues)) }
}

/// Creates an account. The email must not belong to an existing account.
pub async fn register_user(store: &mut impl BlogStore, input: RegisterUser) -> Result<User, AppError> {
    validate_registration(&input)?;
    let user = User {
        id: generate_entity_id(),
        name: input.name,
        email: input.email,
        role: input.role,
        user_name: input.user_name,
        contact_email: input.contact_email,
        age: input.age,
        mobile_number: input.mobile_number,
        address: input.address,
        custom_profile_picture: None,
        profile_image_storage_id: None,
        following: Vec::new(),
        followers: Vec::new(),
        created_at: now(),
        updated_at: None,
    };
    match store.insert_user(user.clone()).await {
        Ok(()) => Ok(user),
        Err(StoreError::UniqueViolation { .. }) => Err(AppError::conflict("Email already registered")),
        Err(err) => Err(err.into()),
    }
}

pub async fn check_email(store: &mut impl BlogStore, email: &str) -> Result<bool, AppError> {
    Ok(store.email_exists(email).await?)
}

pub async fn get_current_user(store: &mut impl BlogStore, session: Option<&Session>) -> Result<User, AppError> {
    let user_id = require_session(session)?.to_string();
    store
        .user(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

pub async fn get_user_by_id(store: &mut impl BlogStore, user_id: &str) -> Result<Option<User>, AppError> {
    Ok(store.user(user_id).await?)
}

/// Accounts in creation order, oldest first.
pub async fn get_paginated_users(
    store: &mut impl BlogStore,
    request: &PageRequest,
) -> Result<Page<User>, AppError> {
    Ok(store.page_users(request).await?)
}

/// Points the actor's profile picture at an externally hosted image.
pub async fn update_author_profile_image(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    image_url: &str,
) -> Result<(), AppError> {
    let user_id = require_session(session)?.to_string();
    if Url::parse(image_url).is_err() {
        return Err(ValidationError::single("image_url", "invalid", "not a valid URL").into());
    }
    match store.set_user_profile_image(&user_id, image_url).await {
        Ok(()) => Ok(()),
        Err(StoreError::Missing { .. }) => Err(AppError::not_found("User")),
        Err(err) => Err(err.into()),
    }
}

/// Links the actor to `target_id`. Both follow arrays are updated in one
/// store call.
pub async fn follow_user(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    target_id: &str,
) -> Result<(), AppError> {
    let actor_id = require_session(session)?.to_string();
    let actor = store
        .user(&actor_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    if actor_id == target_id {
        return Err(AppError::conflict("Cannot follow yourself"));
    }
    if actor.is_following(target_id) {
        return Err(AppError::conflict("Already following this user"));
    }
    if store.user(target_id).await?.is_none() {
        return Err(AppError::not_found("User to follow"));
    }
    store.apply_follow(&actor_id, target_id, FollowChange::Link).await?;
    Ok(())
}

pub async fn unfollow_user(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    target_id: &str,
) -> Result<(), AppError> {
    let actor_id = require_session(session)?.to_string();
    let actor = store
        .user(&actor_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    if actor_id == target_id {
        return Err(AppError::conflict("Cannot unfollow yourself"));
    }
    if !actor.is_following(target_id) {
        return Err(AppError::conflict("Not following this user"));
    }
    match store.apply_follow(&actor_id, target_id, FollowChange::Unlink).await {
        Ok(_) => Ok(()),
        Err(StoreError::Missing { .. }) => Err(AppError::not_found("User to unfollow")),
        Err(err) => Err(err.into()),
    }
}

async fn resolve_users(store: &mut impl BlogStore, ids: &[String]) -> Result<Vec<User>, AppError> {
    let mut users = Vec::with_capacity(ids.len());
    for id in ids {
        // Deleted accounts drop out of the listing.
        if let Some(user) = store.user(id).await? {
            users.push(user);
        }
    }
    Ok(users)
}

pub async fn get_following_list(store: &mut impl BlogStore, user_id: &str) -> Result<Vec<User>, AppError> {
    let user = store
        .user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    resolve_users(store, &user.following).await
}

pub async fn get_followers_list(store: &mut impl BlogStore, user_id: &str) -> Result<Vec<User>, AppError> {
    let user = store
        .user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    resolve_users(store, &user.followers).await
}

pub async fn get_following_count(store: &mut impl BlogStore, user_id: &str) -> Result<usize, AppError> {
    let user = store
        .user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(user.following.len())
}

pub async fn get_followers_count(store: &mut impl BlogStore, user_id: &str) -> Result<usize, AppError> {
    let user = store
        .user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(user.followers.len())
}

pub async fn check_if_following(
    store: &mut impl BlogStore,
    follower_id: &str,
    followee_id: &str,
) -> Result<bool, AppError> {
    let user = store
        .user(follower_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(user.is_following(followee_id))
}
