mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use inkstream::{Config, RedisStore};

use commands::{
    FeedArgs, FollowArgs, InteractArgs, PostArgs, RegisterArgs, SearchArgs, handle_feed, handle_follow,
    handle_interact, handle_popular, handle_post, handle_register, handle_search, handle_unfollow,
};

#[derive(Parser)]
#[command(name = "inkstream", version)]
#[command(about = "Drive an inkstream store: register users, post, like, follow, browse")]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Redis connection URL (overrides config file)
    #[arg(long, global = true, env = "INKSTREAM_REDIS_URL")]
    redis_url: Option<String>,

    /// Key prefix namespacing all documents (overrides config file)
    #[arg(long, global = true, env = "INKSTREAM_KEY_PREFIX")]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register(RegisterArgs),
    /// Publish a blog post
    Post(PostArgs),
    /// Like a blog
    Like(InteractArgs),
    /// Retract a like
    Unlike(InteractArgs),
    /// Save a blog for later
    Save(InteractArgs),
    /// Remove a blog from saved
    Unsave(InteractArgs),
    /// Follow another user
    Follow(FollowArgs),
    /// Unfollow a user
    Unfollow(FollowArgs),
    /// Page through blogs, newest first
    Feed(FeedArgs),
    /// Page through blogs by like count
    Popular(FeedArgs),
    /// Search blog titles and content
    Search(SearchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.redis_url {
        config.redis_url = url;
    }
    if let Some(prefix) = cli.prefix {
        config.key_prefix = prefix;
    }

    let mut store = RedisStore::connect(&config).await?;

    match cli.command {
        Commands::Register(args) => handle_register(&mut store, args).await,
        Commands::Post(args) => handle_post(&mut store, args).await,
        Commands::Like(args) => handle_interact(&mut store, args, commands::Interaction::Like).await,
        Commands::Unlike(args) => handle_interact(&mut store, args, commands::Interaction::Unlike).await,
        Commands::Save(args) => handle_interact(&mut store, args, commands::Interaction::Save).await,
        Commands::Unsave(args) => handle_interact(&mut store, args, commands::Interaction::Unsave).await,
        Commands::Follow(args) => handle_follow(&mut store, args).await,
        Commands::Unfollow(args) => handle_unfollow(&mut store, args).await,
        Commands::Feed(args) => handle_feed(&mut store, args).await,
        Commands::Popular(args) => handle_popular(&mut store, args).await,
        Commands::Search(args) => handle_search(&mut store, args).await,
    }
}
