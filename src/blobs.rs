//! Blob storage seam for blog images and profile pictures.
//!
//! Uploads are two-phase: `generate_upload_url` hands out a one-time token,
//! and `finish_upload` redeems it for a storage id. Records keep the storage
//! id; `url` turns it back into something a client can fetch.

use redis::{aio::ConnectionManager, cmd};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::id::generate_entity_id;
use crate::keys::KeyContext;

/// Seconds a generated upload token stays redeemable.
const UPLOAD_TOKEN_TTL_SECS: u64 = 600;

const BLOBS: &str = "blobs";

/// A one-time upload grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    pub token: String,
    pub url: String,
}

fn new_grant() -> UploadGrant {
    let token = Uuid::new_v4().to_string();
    let url = format!("/upload/{token}");
    UploadGrant { token, url }
}

fn unknown_token(token: &str) -> StoreError {
    StoreError::invalid(format!("upload token not recognized: {token}"))
}

#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Issues a one-time upload URL. The token expires if unredeemed.
    async fn generate_upload_url(&mut self) -> Result<UploadGrant, StoreError>;

    /// Redeems an upload token for a storage id, consuming the token.
    async fn finish_upload(
        &mut self,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;

    /// Fetchable URL for a stored blob, or `None` if it was deleted.
    async fn url(&mut self, storage_id: &str) -> Result<Option<String>, StoreError>;

    /// Removes a blob. Returns whether anything was stored under the id.
    async fn delete(&mut self, storage_id: &str) -> Result<bool, StoreError>;
}

/// In-process blob store used by tests and local development.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    pending: HashSet<String>,
    blobs: HashMap<String, (String, Vec<u8>)>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self, storage_id: &str) -> Option<&(String, Vec<u8>)> {
        self.blobs.get(storage_id)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn generate_upload_url(&mut self) -> Result<UploadGrant, StoreError> {
        let grant = new_grant();
        self.pending.insert(grant.token.clone());
        Ok(grant)
    }

    async fn finish_upload(
        &mut self,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        if !self.pending.remove(token) {
            return Err(unknown_token(token));
        }
        let storage_id = generate_entity_id();
        self.blobs.insert(storage_id.clone(), (content_type.to_string(), bytes));
        Ok(storage_id)
    }

    async fn url(&mut self, storage_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .blobs
            .contains_key(storage_id)
            .then(|| format!("/blobs/{storage_id}")))
    }

    async fn delete(&mut self, storage_id: &str) -> Result<bool, StoreError> {
        Ok(self.blobs.remove(storage_id).is_some())
    }
}

/// Blob store backed by the same Redis instance as the documents.
///
/// Tokens live under `{prefix}:blobs:token:{uuid}` with a TTL; redeeming one
/// is a `GETDEL`, so a token can be spent at most once. Blob bytes and their
/// content type live in a hash at `{prefix}:blobs:{storage_id}`.
pub struct RedisBlobStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisBlobStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    fn token_key(&self, token: &str) -> String {
        format!("{}:{}:token:{}", self.prefix, BLOBS, token)
    }

    fn blob_key(&self, storage_id: &str) -> String {
        KeyContext::new(&self.prefix).entity(BLOBS, storage_id)
    }
}

impl BlobStore for RedisBlobStore {
    async fn generate_upload_url(&mut self) -> Result<UploadGrant, StoreError> {
        let grant = new_grant();
        let _: () = cmd("SET")
            .arg(self.token_key(&grant.token))
            .arg("pending")
            .arg("EX")
            .arg(UPLOAD_TOKEN_TTL_SECS)
            .query_async(&mut self.conn)
            .await?;
        Ok(grant)
    }

    async fn finish_upload(
        &mut self,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let claimed: Option<String> = cmd("GETDEL")
            .arg(self.token_key(token))
            .query_async(&mut self.conn)
            .await?;
        if claimed.is_none() {
            return Err(unknown_token(token));
        }
        let storage_id = generate_entity_id();
        let _: () = cmd("HSET")
            .arg(self.blob_key(&storage_id))
            .arg("content_type")
            .arg(content_type)
            .arg("data")
            .arg(bytes)
            .query_async(&mut self.conn)
            .await?;
        Ok(storage_id)
    }

    async fn url(&mut self, storage_id: &str) -> Result<Option<String>, StoreError> {
        let exists: i64 = cmd("EXISTS")
            .arg(self.blob_key(storage_id))
            .query_async(&mut self.conn)
            .await?;
        Ok((exists == 1).then(|| format!("/blobs/{storage_id}")))
    }

    async fn delete(&mut self, storage_id: &str) -> Result<bool, StoreError> {
        let removed: i64 = cmd("DEL")
            .arg(self.blob_key(storage_id))
            .query_async(&mut self.conn)
            .await?;
        Ok(removed == 1)
    }
}
