//! Query/mutation surface consumed by clients.
//!
//! Operations are free async functions over a `BlogStore` (and a `BlobStore`
//! where images are involved). Authentication is an `Option<&Session>`
//! argument; operations that need an actor fail with
//! `AppError::Unauthenticated` when given `None`.

pub mod blogs;
pub mod interactions;
pub mod profiles;
pub mod users;
