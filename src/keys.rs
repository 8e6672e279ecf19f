/// Key-construction helpers shared by the Redis store and its Lua scripts.
///
/// Layout:
/// - entity documents:      `{prefix}:{collection}:{entity_id}`
/// - unique value guards:   `{prefix}:{collection}:unique:{field}:{value}`
/// - ordered indexes:       `{prefix}:{collection}:idx:{name}` (ZSET)
/// - per-user interactions: `{prefix}:interactions:by_user:{user_id}` (SET)
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
}

pub const USERS: &str = "users";
pub const BLOGS: &str = "blogs";
pub const INTERACTIONS: &str = "interactions";
pub const PROFILES: &str = "user_profiles";

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}", self.prefix, collection, entity_id)
    }

    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!("{}:{}:unique:{}:{}", self.prefix, collection, field, value)
    }

    pub fn index(&self, collection: &str, name: &str) -> String {
        format!("{}:{}:idx:{}", self.prefix, collection, name)
    }

    pub fn interactions_by_user(&self, user_id: &str) -> String {
        format!("{}:{}:by_user:{}", self.prefix, INTERACTIONS, user_id)
    }
}
