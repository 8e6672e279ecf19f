//! Extended profile CRUD with patch-merge semantics.

use crate::errors::AppError;
use crate::id::generate_entity_id;
use crate::models::{ProfileDetails, UserProfile};
use crate::session::{Session, require_session};
use crate::store::BlogStore;

/// Creates the actor's extended profile, or merges `details` into the
/// existing one field by field.
pub async fn upsert_user_details(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    details: ProfileDetails,
) -> Result<UserProfile, AppError> {
    let user_id = require_session(session)?.to_string();
    match store.profile_for_user(&user_id).await? {
        Some(mut profile) => {
            profile.details = profile.details.merged_with(&details);
            store.put_profile(profile.clone()).await?;
            Ok(profile)
        }
        None => {
            let profile = UserProfile {
                id: generate_entity_id(),
                existing_user_id: Some(user_id),
                details,
            };
            store.insert_profile(profile.clone()).await?;
            Ok(profile)
        }
    }
}

/// Merges `details` into an existing profile. Only the linked user may
/// update it.
pub async fn update_user_details(
    store: &mut impl BlogStore,
    session: Option<&Session>,
    profile_id: &str,
    details: ProfileDetails,
) -> Result<UserProfile, AppError> {
    let user_id = require_session(session)?.to_string();
    let mut profile = store
        .profile(profile_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile"))?;
    if profile.existing_user_id.as_deref() != Some(user_id.as_str()) {
        return Err(AppError::unauthorized(
            "Unauthorized: You can only update your own details.",
        ));
    }
    profile.details = profile.details.merged_with(&details);
    store.put_profile(profile.clone()).await?;
    Ok(profile)
}

/// The actor's extended profile, or `None` if they never created one.
pub async fn get_user_profiles(
    store: &mut impl BlogStore,
    session: Option<&Session>,
) -> Result<Option<UserProfile>, AppError> {
    let user_id = require_session(session)?.to_string();
    Ok(store.profile_for_user(&user_id).await?)
}

pub async fn get_user_details_by_id(
    store: &mut impl BlogStore,
    profile_id: &str,
) -> Result<Option<UserProfile>, AppError> {
    Ok(store.profile(profile_id).await?)
}
