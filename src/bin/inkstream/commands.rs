use anyhow::Result;
use clap::Args;

use inkstream::api::{blogs, interactions, users};
use inkstream::api::blogs::NewBlog;
use inkstream::api::users::RegisterUser;
use inkstream::{PageRequest, RedisStore, Session};

use crate::output;

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// Account email, must be unused
    #[arg(long)]
    pub email: String,
    /// Optional handle
    #[arg(long)]
    pub user_name: Option<String>,
}

#[derive(Args)]
pub struct PostArgs {
    /// Acting user id
    #[arg(long = "as", value_name = "USER_ID")]
    pub acting_user: String,
    /// Blog title
    #[arg(long)]
    pub title: String,
    /// Blog body (HTML allowed)
    #[arg(long)]
    pub content: String,
    /// Externally hosted cover image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Args)]
pub struct InteractArgs {
    /// Acting user id
    #[arg(long = "as", value_name = "USER_ID")]
    pub acting_user: String,
    /// Target blog id
    pub blog_id: String,
}

#[derive(Args)]
pub struct FollowArgs {
    /// Acting user id
    #[arg(long = "as", value_name = "USER_ID")]
    pub acting_user: String,
    /// Target user id
    pub user_id: String,
}

#[derive(Args)]
pub struct FeedArgs {
    /// Continuation cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,
    /// Page size
    #[arg(long, default_value_t = 10)]
    pub num_items: u64,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Term matched against titles and content
    pub term: String,
}

#[derive(Clone, Copy)]
pub enum Interaction {
    Like,
    Unlike,
    Save,
    Unsave,
}

pub async fn handle_register(store: &mut RedisStore, args: RegisterArgs) -> Result<()> {
    let user = users::register_user(
        store,
        RegisterUser {
            name: args.name,
            email: args.email,
            user_name: args.user_name,
            ..Default::default()
        },
    )
    .await?;
    output::success(&format!("registered {} ({})", user.name, user.id));
    Ok(())
}

pub async fn handle_post(store: &mut RedisStore, args: PostArgs) -> Result<()> {
    let session = Session::for_user(args.acting_user);
    let blog = blogs::create_blog(
        store,
        Some(&session),
        NewBlog {
            name: args.title,
            content: args.content,
            image: None,
            image_url: args.image_url,
        },
    )
    .await?;
    output::success(&format!("published \"{}\" ({})", blog.name, blog.id));
    Ok(())
}

pub async fn handle_interact(store: &mut RedisStore, args: InteractArgs, kind: Interaction) -> Result<()> {
    let session = Session::for_user(args.acting_user);
    let session = Some(&session);
    let verb = match kind {
        Interaction::Like => {
            interactions::like_blog(store, session, &args.blog_id).await?;
            "liked"
        }
        Interaction::Unlike => {
            interactions::unlike_blog(store, session, &args.blog_id).await?;
            "unliked"
        }
        Interaction::Save => {
            interactions::save_blog(store, session, &args.blog_id).await?;
            "saved"
        }
        Interaction::Unsave => {
            interactions::unsave_blog(store, session, &args.blog_id).await?;
            "unsaved"
        }
    };
    output::success(&format!("{verb} blog {}", args.blog_id));
    Ok(())
}

pub async fn handle_follow(store: &mut RedisStore, args: FollowArgs) -> Result<()> {
    let session = Session::for_user(args.acting_user);
    users::follow_user(store, Some(&session), &args.user_id).await?;
    output::success(&format!("now following {}", args.user_id));
    Ok(())
}

pub async fn handle_unfollow(store: &mut RedisStore, args: FollowArgs) -> Result<()> {
    let session = Session::for_user(args.acting_user);
    users::unfollow_user(store, Some(&session), &args.user_id).await?;
    output::success(&format!("unfollowed {}", args.user_id));
    Ok(())
}

fn page_request(args: &FeedArgs) -> PageRequest {
    PageRequest {
        cursor: args.cursor.clone(),
        num_items: Some(args.num_items),
    }
}

pub async fn handle_feed(store: &mut RedisStore, args: FeedArgs) -> Result<()> {
    let page = blogs::get_paginated_blogs(store, &page_request(&args)).await?;
    output::print_blog_page(&page);
    Ok(())
}

pub async fn handle_popular(store: &mut RedisStore, args: FeedArgs) -> Result<()> {
    let page = blogs::get_popular_blogs(store, &page_request(&args)).await?;
    output::print_blog_page(&page);
    Ok(())
}

pub async fn handle_search(store: &mut RedisStore, args: SearchArgs) -> Result<()> {
    let results = blogs::search_blogs(store, &args.term).await?;
    if results.is_empty() {
        output::note("no matches");
        return Ok(());
    }
    output::print_blogs(&results);
    Ok(())
}
