//! Production store over Redis.
//!
//! Entity documents are RedisJSON values; listing order comes from ZSET
//! secondary indexes (`by_created`, `by_likes`); unique emails are guarded
//! by `SETNX` keys. Every mutation that touches more than one key runs as a
//! Lua script, so the relation write and the denormalized counter (or the
//! paired follower/following arrays) can never be observed half-applied.

use log::debug;
use redis::{Script, aio::ConnectionManager, cmd};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::config::Config;
use crate::errors::StoreError;
use crate::id::interaction_id;
use crate::keys::{BLOGS, INTERACTIONS, KeyContext, PROFILES, USERS};
use crate::models::{Blog, BlogInteraction, InteractionFlag, User, UserProfile};
use crate::page::{Page, PageRequest};
use crate::search;
use crate::store::{BlogOrder, BlogPatch, BlogStore, FollowChange};

mod scripts;

use scripts::{
    BLOG_DELETE_SCRIPT, BLOG_PATCH_SCRIPT, FOLLOW_SCRIPT, INTERACTION_SET_SCRIPT, USER_INSERT_SCRIPT,
};

const BY_CREATED: &str = "by_created";
const BY_LIKES: &str = "by_likes";

pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let conn = client.get_connection_manager().await?;
        Ok(Self::new(conn, config.key_prefix.clone()))
    }

    fn keys(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix)
    }

    async fn get_doc<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, StoreError> {
        let raw: Option<String> = cmd("JSON.GET").arg(key).query_async(&mut self.conn).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn fetch_docs<T: DeserializeOwned>(&mut self, keys: Vec<String>) -> Result<Vec<T>, StoreError> {
        let mut docs = Vec::with_capacity(keys.len());
        for key in keys {
            // Skip members whose document vanished between the index read
            // and the fetch.
            if let Some(doc) = self.get_doc(&key).await? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    async fn run_script(&mut self, script: &Script, keys: &[String], payload: Value) -> Result<Value, StoreError> {
        let mut invocation = script.prepare_invoke();
        for key in keys {
            invocation.key(key.as_str());
        }
        invocation.arg(payload.to_string());
        let raw: String = invocation.invoke_async(&mut self.conn).await?;
        let value: Value = serde_json::from_str(&raw)?;
        if let Some(code) = value.get("error").and_then(Value::as_str) {
            return Err(match code {
                "entity_not_found" => StoreError::Missing {
                    key: value.get("key").and_then(Value::as_str).map(str::to_string),
                },
                "unique_violation" => StoreError::UniqueViolation {
                    field: value
                        .get("field")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    value: String::new(),
                },
                other => StoreError::other(format!("script error: {other}")),
            });
        }
        Ok(value)
    }

    /// Members of an ordered index at the requested page window, plus the
    /// decoded offset and the index cardinality.
    async fn page_ids(
        &mut self,
        index_key: &str,
        newest_first: bool,
        request: &PageRequest,
    ) -> Result<(Vec<String>, u64, u64), StoreError> {
        let offset = request.offset()?;
        let limit = request.limit();
        let total: u64 = cmd("ZCARD").arg(index_key).query_async(&mut self.conn).await?;
        let range = if newest_first { "ZREVRANGE" } else { "ZRANGE" };
        let ids: Vec<String> = cmd(range)
            .arg(index_key)
            .arg(offset)
            .arg(offset + limit - 1)
            .query_async(&mut self.conn)
            .await?;
        Ok((ids, offset, total))
    }

    async fn all_ids(&mut self, index_key: &str) -> Result<Vec<String>, StoreError> {
        let ids: Vec<String> = cmd("ZREVRANGE")
            .arg(index_key)
            .arg(0)
            .arg(-1)
            .query_async(&mut self.conn)
            .await?;
        Ok(ids)
    }

    async fn put_doc<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        let _: () = cmd("JSON.SET")
            .arg(key)
            .arg("$")
            .arg(json)
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }
}

impl BlogStore for RedisStore {
    async fn insert_user(&mut self, user: User) -> Result<(), StoreError> {
        let ctx = self.keys();
        let email = user.email.to_lowercase();
        let keys = [
            ctx.entity(USERS, &user.id),
            ctx.unique(USERS, "email", &email),
            ctx.index(USERS, BY_CREATED),
        ];
        let payload = json!({
            "user_id": user.id,
            "user_json": serde_json::to_string(&user)?,
            "created_score": user.created_at.timestamp_millis(),
        });
        match self.run_script(&USER_INSERT_SCRIPT, &keys, payload).await {
            Ok(_) => Ok(()),
            Err(StoreError::UniqueViolation { field, .. }) => Err(StoreError::UniqueViolation {
                field,
                value: user.email,
            }),
            Err(err) => Err(err),
        }
    }

    async fn user(&mut self, user_id: &str) -> Result<Option<User>, StoreError> {
        let key = self.keys().entity(USERS, user_id);
        self.get_doc(&key).await
    }

    async fn email_exists(&mut self, email: &str) -> Result<bool, StoreError> {
        let key = self.keys().unique(USERS, "email", &email.to_lowercase());
        let exists: i64 = cmd("EXISTS").arg(&key).query_async(&mut self.conn).await?;
        Ok(exists == 1)
    }

    async fn page_users(&mut self, request: &PageRequest) -> Result<Page<User>, StoreError> {
        let index = self.keys().index(USERS, BY_CREATED);
        let (ids, offset, total) = self.page_ids(&index, false, request).await?;
        let keys = ids.iter().map(|id| self.keys().entity(USERS, id)).collect();
        let users = self.fetch_docs(keys).await?;
        Ok(Page::from_slice(users, offset, total))
    }

    async fn set_user_profile_image(&mut self, user_id: &str, image_url: &str) -> Result<(), StoreError> {
        let key = self.keys().entity(USERS, user_id);
        let exists: i64 = cmd("EXISTS").arg(&key).query_async(&mut self.conn).await?;
        if exists == 0 {
            return Err(StoreError::Missing { key: Some(key) });
        }
        let _: () = cmd("JSON.SET")
            .arg(&key)
            .arg("$.custom_profile_picture")
            .arg(serde_json::to_string(image_url)?)
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }

    async fn apply_follow(
        &mut self,
        follower_id: &str,
        followee_id: &str,
        change: FollowChange,
    ) -> Result<bool, StoreError> {
        let ctx = self.keys();
        let keys = [ctx.entity(USERS, follower_id), ctx.entity(USERS, followee_id)];
        let payload = json!({
            "follower_id": follower_id,
            "followee_id": followee_id,
            "change": match change {
                FollowChange::Link => "link",
                FollowChange::Unlink => "unlink",
            },
        });
        let response = self.run_script(&FOLLOW_SCRIPT, &keys, payload).await?;
        let changed = response.get("changed").and_then(Value::as_bool).unwrap_or(false);
        debug!("follow {change:?} {follower_id} -> {followee_id}: changed={changed}");
        Ok(changed)
    }

    async fn insert_blog(&mut self, blog: Blog) -> Result<(), StoreError> {
        let ctx = self.keys();
        let doc_key = ctx.entity(BLOGS, &blog.id);
        let by_created = ctx.index(BLOGS, BY_CREATED);
        let by_likes = ctx.index(BLOGS, BY_LIKES);
        let json = serde_json::to_string(&blog)?;
        let _: () = redis::pipe()
            .atomic()
            .cmd("JSON.SET")
            .arg(&doc_key)
            .arg("$")
            .arg(json)
            .ignore()
            .cmd("ZADD")
            .arg(&by_created)
            .arg(blog.created_at.timestamp_millis())
            .arg(&blog.id)
            .ignore()
            .cmd("ZADD")
            .arg(&by_likes)
            .arg(blog.total_likes)
            .arg(&blog.id)
            .ignore()
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }

    async fn blog(&mut self, blog_id: &str) -> Result<Option<Blog>, StoreError> {
        let key = self.keys().entity(BLOGS, blog_id);
        self.get_doc(&key).await
    }

    async fn patch_blog(&mut self, blog_id: &str, patch: BlogPatch) -> Result<Blog, StoreError> {
        let keys = [self.keys().entity(BLOGS, blog_id)];
        let mut sets = serde_json::Map::new();
        sets.insert("name".into(), Value::String(serde_json::to_string(&patch.name)?));
        sets.insert("content".into(), Value::String(serde_json::to_string(&patch.content)?));
        sets.insert(
            "updated_at".into(),
            Value::String(serde_json::to_string(&patch.updated_at)?),
        );
        let mut clears = Vec::new();
        match &patch.image {
            Some(image) => {
                sets.insert("image".into(), Value::String(serde_json::to_string(image)?));
            }
            None => clears.push("image"),
        }
        match &patch.image_url {
            Some(url) => {
                sets.insert("image_url".into(), Value::String(serde_json::to_string(url)?));
            }
            None => clears.push("image_url"),
        }
        let payload = json!({ "sets": sets, "clears": clears });
        let response = self.run_script(&BLOG_PATCH_SCRIPT, &keys, payload).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn delete_blog(&mut self, blog_id: &str) -> Result<Blog, StoreError> {
        let ctx = self.keys();
        let keys = [
            ctx.entity(BLOGS, blog_id),
            ctx.index(BLOGS, BY_CREATED),
            ctx.index(BLOGS, BY_LIKES),
        ];
        let payload = json!({ "blog_id": blog_id });
        let response = self.run_script(&BLOG_DELETE_SCRIPT, &keys, payload).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn all_blogs(&mut self) -> Result<Vec<Blog>, StoreError> {
        let index = self.keys().index(BLOGS, BY_CREATED);
        let ids = self.all_ids(&index).await?;
        let keys = ids.iter().map(|id| self.keys().entity(BLOGS, id)).collect();
        self.fetch_docs(keys).await
    }

    async fn page_blogs(&mut self, order: BlogOrder, request: &PageRequest) -> Result<Page<Blog>, StoreError> {
        let index = match order {
            BlogOrder::Newest => self.keys().index(BLOGS, BY_CREATED),
            BlogOrder::MostLiked => self.keys().index(BLOGS, BY_LIKES),
        };
        let (ids, offset, total) = self.page_ids(&index, true, request).await?;
        let keys = ids.iter().map(|id| self.keys().entity(BLOGS, id)).collect();
        let blogs = self.fetch_docs(keys).await?;
        Ok(Page::from_slice(blogs, offset, total))
    }

    async fn blogs_by_author(&mut self, author_id: &str) -> Result<Vec<Blog>, StoreError> {
        let blogs = self.all_blogs().await?;
        Ok(blogs.into_iter().filter(|blog| blog.author_id == author_id).collect())
    }

    async fn search_blogs(&mut self, term: &str) -> Result<Vec<Blog>, StoreError> {
        let normalized = search::normalize_term(term);
        let matches = self
            .all_blogs()
            .await?
            .into_iter()
            .filter_map(|blog| search::rank_match(&blog, &normalized).map(|rank| (rank, blog)))
            .collect();
        Ok(search::order_matches(matches))
    }

    async fn interaction(&mut self, user_id: &str, blog_id: &str) -> Result<Option<BlogInteraction>, StoreError> {
        let key = self.keys().entity(INTERACTIONS, &interaction_id(user_id, blog_id));
        self.get_doc(&key).await
    }

    async fn set_interaction_flag(
        &mut self,
        user_id: &str,
        blog_id: &str,
        flag: InteractionFlag,
        engaged: bool,
    ) -> Result<bool, StoreError> {
        let record_id = interaction_id(user_id, blog_id);
        let ctx = self.keys();
        let keys = [
            ctx.entity(INTERACTIONS, &record_id),
            ctx.entity(BLOGS, blog_id),
            ctx.interactions_by_user(user_id),
            ctx.index(BLOGS, BY_LIKES),
        ];
        let record = BlogInteraction::new(user_id, blog_id);
        let payload = json!({
            "interaction_id": record_id,
            "blog_id": blog_id,
            "flag_field": flag.field(),
            "counter_field": flag.counter(),
            "engaged": engaged,
            "record_json": serde_json::to_string(&record)?,
        });
        let response = self.run_script(&INTERACTION_SET_SCRIPT, &keys, payload).await?;
        let changed = response.get("changed").and_then(Value::as_bool).unwrap_or(false);
        debug!("interaction {flag:?}={engaged} {user_id}/{blog_id}: changed={changed}");
        Ok(changed)
    }

    async fn interactions_by_user(&mut self, user_id: &str) -> Result<Vec<BlogInteraction>, StoreError> {
        let set_key = self.keys().interactions_by_user(user_id);
        let ids: Vec<String> = cmd("SMEMBERS").arg(&set_key).query_async(&mut self.conn).await?;
        let keys = ids
            .iter()
            .map(|id| self.keys().entity(INTERACTIONS, id))
            .collect();
        self.fetch_docs(keys).await
    }

    async fn insert_profile(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        let ctx = self.keys();
        let key = ctx.entity(PROFILES, &profile.id);
        let json = serde_json::to_string(&profile)?;
        let mut pipe = redis::pipe();
        pipe.atomic().cmd("JSON.SET").arg(&key).arg("$").arg(json).ignore();
        if let Some(user_id) = &profile.existing_user_id {
            let guard = ctx.unique(PROFILES, "existing_user_id", user_id);
            pipe.cmd("SET").arg(&guard).arg(&profile.id).ignore();
        }
        let _: () = pipe.query_async(&mut self.conn).await?;
        Ok(())
    }

    async fn put_profile(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        let key = self.keys().entity(PROFILES, &profile.id);
        let exists: i64 = cmd("EXISTS").arg(&key).query_async(&mut self.conn).await?;
        if exists == 0 {
            return Err(StoreError::Missing { key: Some(key) });
        }
        self.insert_profile(profile).await
    }

    async fn profile(&mut self, profile_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let key = self.keys().entity(PROFILES, profile_id);
        self.get_doc(&key).await
    }

    async fn profile_for_user(&mut self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let guard = self.keys().unique(PROFILES, "existing_user_id", user_id);
        let profile_id: Option<String> = cmd("GET").arg(&guard).query_async(&mut self.conn).await?;
        match profile_id {
            Some(id) => self.profile(&id).await,
            None => Ok(None),
        }
    }
}
