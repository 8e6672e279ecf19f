use redis::Script;
use std::sync::LazyLock;

pub const USER_INSERT_SCRIPT_BODY: &str = include_str!("../../lua/user_insert.lua");
pub const FOLLOW_SCRIPT_BODY: &str = include_str!("../../lua/follow.lua");
pub const INTERACTION_SET_SCRIPT_BODY: &str = include_str!("../../lua/interaction_set.lua");
pub const BLOG_PATCH_SCRIPT_BODY: &str = include_str!("../../lua/blog_patch.lua");
pub const BLOG_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/blog_delete.lua");

pub static USER_INSERT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(USER_INSERT_SCRIPT_BODY));
pub static FOLLOW_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FOLLOW_SCRIPT_BODY));
pub static INTERACTION_SET_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(INTERACTION_SET_SCRIPT_BODY));
pub static BLOG_PATCH_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(BLOG_PATCH_SCRIPT_BODY));
pub static BLOG_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(BLOG_DELETE_SCRIPT_BODY));
