//! Inkstream core library.
//!
//! Social blogging backend over a Redis document store: accounts and a
//! follow graph, posts with denormalized like/save counters kept consistent
//! by atomic store calls, an interaction join table, cursor pagination, and
//! free-text search. The `api` module is the surface clients call; `store`
//! holds the document-store seam with Redis and in-memory implementations.

pub mod api;
pub mod blobs;
pub mod config;
pub mod errors;
pub mod id;
pub mod keys;
pub mod models;
pub mod page;
pub mod search;
pub mod session;
pub mod store;

pub use blobs::{BlobStore, MemoryBlobStore, RedisBlobStore, UploadGrant};
pub use config::Config;
pub use errors::{AppError, StoreError, ValidationError, ValidationIssue};
pub use models::{Blog, BlogInteraction, InteractionFlag, ProfileDetails, Role, User, UserProfile};
pub use page::{Page, PageRequest, PageStatus};
pub use session::Session;
pub use store::{BlogOrder, BlogStore, FollowChange, MemoryStore, RedisStore};
