#![allow(dead_code)]

pub(crate) use inkstream::api::blogs::{self, BlogEdit, NewBlog};
pub(crate) use inkstream::api::interactions;
pub(crate) use inkstream::api::profiles;
pub(crate) use inkstream::api::users::{self, RegisterUser};
pub(crate) use inkstream::{
    AppError, Blog, MemoryBlobStore, MemoryStore, PageRequest, ProfileDetails, Session, User,
};

pub(crate) fn session_for(user: &User) -> Session {
    Session::for_user(user.id.clone())
}

pub(crate) async fn register(store: &mut MemoryStore, name: &str, email: &str) -> User {
    users::register_user(
        store,
        RegisterUser {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("register user")
}

pub(crate) async fn publish(store: &mut MemoryStore, author: &User, title: &str, content: &str) -> Blog {
    let session = session_for(author);
    blogs::create_blog(
        store,
        Some(&session),
        NewBlog {
            name: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("create blog")
}
