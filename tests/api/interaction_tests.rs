use super::support::*;

#[tokio::test]
async fn like_round_trips_through_the_counter() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Counters", "body").await;
    let session = session_for(&reader);

    interactions::like_blog(&mut store, Some(&session), &blog.id)
        .await
        .expect("like");
    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 1);

    let record = interactions::get_blog_interaction(&mut store, &reader.id, &blog.id)
        .await
        .unwrap()
        .expect("interaction record");
    assert!(record.is_liked);
    assert!(!record.is_saved);

    interactions::unlike_blog(&mut store, Some(&session), &blog.id)
        .await
        .expect("unlike");
    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 0);

    // The record persists with the flag lowered.
    let record = interactions::get_blog_interaction(&mut store, &reader.id, &blog.id)
        .await
        .unwrap()
        .expect("record survives unlike");
    assert!(!record.is_liked);
}

#[tokio::test]
async fn duplicate_like_increments_once() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Once", "body").await;
    let session = session_for(&reader);

    interactions::like_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    interactions::like_blog(&mut store, Some(&session), &blog.id).await.unwrap();

    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 1);
}

#[tokio::test]
async fn unlike_without_like_leaves_no_trace() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Nothing", "body").await;
    let session = session_for(&reader);

    interactions::unlike_blog(&mut store, Some(&session), &blog.id)
        .await
        .expect("redundant unlike is a no-op");
    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 0);
    assert!(
        interactions::get_blog_interaction(&mut store, &reader.id, &blog.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn counter_clamps_at_zero() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Clamp", "body").await;
    let session = session_for(&reader);

    interactions::like_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    interactions::unlike_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    interactions::unlike_blog(&mut store, Some(&session), &blog.id).await.unwrap();

    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 0);
}

#[tokio::test]
async fn save_is_tracked_separately_from_like() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Two flags", "body").await;
    let session = session_for(&reader);

    interactions::save_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    assert_eq!(blogs::total_saved(&mut store, &blog.id).await.unwrap(), 1);
    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 0);

    let record = interactions::get_blog_interaction(&mut store, &reader.id, &blog.id)
        .await
        .unwrap()
        .unwrap();
    assert!(record.is_saved);
    assert!(!record.is_liked);

    interactions::unsave_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    assert_eq!(blogs::total_saved(&mut store, &blog.id).await.unwrap(), 0);
}

#[tokio::test]
async fn likes_from_distinct_users_accumulate() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Popular", "body").await;

    for n in 0..3 {
        let reader = register(&mut store, "Reader", &format!("reader{n}@example.com")).await;
        let session = session_for(&reader);
        interactions::like_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    }

    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 3);
}

#[tokio::test]
async fn liked_and_saved_listings_follow_the_flags() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let liked = publish(&mut store, &author, "Liked one", "body").await;
    let saved = publish(&mut store, &author, "Saved one", "body").await;
    let session = session_for(&reader);

    interactions::like_blog(&mut store, Some(&session), &liked.id).await.unwrap();
    interactions::save_blog(&mut store, Some(&session), &saved.id).await.unwrap();

    let liked_list = interactions::get_liked_blogs(&mut store, &reader.id).await.unwrap();
    assert_eq!(liked_list.len(), 1);
    assert_eq!(liked_list[0].id, liked.id);

    let saved_list = interactions::get_saved_blogs(&mut store, &reader.id).await.unwrap();
    assert_eq!(saved_list.len(), 1);
    assert_eq!(saved_list[0].id, saved.id);
}

#[tokio::test]
async fn deleted_blogs_drop_out_of_listings() {
    let mut store = MemoryStore::new();
    let mut blobs = MemoryBlobStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Ephemeral", "body").await;

    let reader_session = session_for(&reader);
    interactions::save_blog(&mut store, Some(&reader_session), &blog.id).await.unwrap();

    let author_session = session_for(&author);
    blogs::remove_blog(&mut store, &mut blobs, Some(&author_session), &blog.id)
        .await
        .unwrap();

    // The interaction record outlives the blog; the listing skips it.
    assert!(
        interactions::get_blog_interaction(&mut store, &reader.id, &blog.id)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        interactions::get_saved_blogs(&mut store, &reader.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn liking_a_missing_blog_is_not_found() {
    let mut store = MemoryStore::new();
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let session = session_for(&reader);

    let err = interactions::like_blog(&mut store, Some(&session), "missing")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Blog not found");
}

#[tokio::test]
async fn liking_requires_a_session() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Locked", "body").await;

    let err = interactions::like_blog(&mut store, None, &blog.id).await.unwrap_err();
    assert_eq!(err.to_string(), "User not authenticated");
}
