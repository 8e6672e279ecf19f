use super::support::*;

use inkstream::BlobStore;

#[tokio::test]
async fn create_stamps_author_from_the_session() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Hello", "<p>world</p>").await;

    assert_eq!(blog.author_id, author.id);
    assert_eq!(blog.author_name, "Author");
    assert_eq!(blog.total_likes, 0);
    assert_eq!(blog.total_saved, 0);
    assert!(blog.updated_at.is_none());

    let fetched = blogs::get_blog_by_id(&mut store, &blog.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Hello");
    assert_eq!(fetched.content, "<p>world</p>");
}

#[tokio::test]
async fn create_requires_a_session() {
    let mut store = MemoryStore::new();
    let err = blogs::create_blog(
        &mut store,
        None,
        NewBlog {
            name: "Nope".to_string(),
            content: "body".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "User not authenticated");
}

#[tokio::test]
async fn create_validates_title_content_and_image_url() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let session = session_for(&author);

    let err = blogs::create_blog(
        &mut store,
        Some(&session),
        NewBlog {
            name: "  ".to_string(),
            content: "".to_string(),
            image_url: Some("not a url".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    let AppError::Validation(validation) = err else {
        panic!("expected validation error, got {err}");
    };
    let fields: Vec<&str> = validation.issues.iter().map(|i| i.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "content", "image_url"]);
}

#[tokio::test]
async fn author_can_update_their_blog() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let blog = publish(&mut store, &author, "Draft", "v1").await;
    let session = session_for(&author);

    let updated = blogs::update_blog(
        &mut store,
        Some(&session),
        &blog.id,
        BlogEdit {
            name: "Final".to_string(),
            content: "v2".to_string(),
            image: None,
            image_url: Some("https://img.example.com/cover.png".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Final");
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.image_url.as_deref(), Some("https://img.example.com/cover.png"));
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.author_id, author.id);
}

#[tokio::test]
async fn strangers_cannot_update_and_the_record_is_untouched() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let stranger = register(&mut store, "Stranger", "stranger@example.com").await;
    let blog = publish(&mut store, &author, "Mine", "body").await;
    let session = session_for(&stranger);

    let err = blogs::update_blog(
        &mut store,
        Some(&session),
        &blog.id,
        BlogEdit {
            name: "Theirs".to_string(),
            content: "hijacked".to_string(),
            image: None,
            image_url: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized to update this blog");

    let fetched = blogs::get_blog_by_id(&mut store, &blog.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Mine");
    assert_eq!(fetched.content, "body");
    assert!(fetched.updated_at.is_none());
}

#[tokio::test]
async fn strangers_cannot_delete() {
    let mut store = MemoryStore::new();
    let mut blobs_store = MemoryBlobStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let stranger = register(&mut store, "Stranger", "stranger@example.com").await;
    let blog = publish(&mut store, &author, "Mine", "body").await;
    let session = session_for(&stranger);

    let err = blogs::remove_blog(&mut store, &mut blobs_store, Some(&session), &blog.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized to delete this blog");
    assert!(blogs::get_blog_by_id(&mut store, &blog.id).await.unwrap().is_some());
}

#[tokio::test]
async fn remove_deletes_the_image_blob_then_the_record() {
    let mut store = MemoryStore::new();
    let mut blobs_store = MemoryBlobStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let session = session_for(&author);

    let grant = blogs::generate_upload_url(&mut blobs_store, Some(&session)).await.unwrap();
    let storage_id = blobs_store
        .finish_upload(&grant.token, "image/png", vec![0xde, 0xad])
        .await
        .unwrap();

    let blog = blogs::create_blog(
        &mut store,
        Some(&session),
        NewBlog {
            name: "Illustrated".to_string(),
            content: "body".to_string(),
            image: Some(storage_id.clone()),
            image_url: None,
        },
    )
    .await
    .unwrap();

    let removed = blogs::remove_blog(&mut store, &mut blobs_store, Some(&session), &blog.id)
        .await
        .unwrap();
    assert_eq!(removed.id, blog.id);
    assert!(blogs::get_blog_by_id(&mut store, &blog.id).await.unwrap().is_none());
    assert!(blobs_store.url(&storage_id).await.unwrap().is_none());
}

#[tokio::test]
async fn create_like_unlike_scenario() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let reader = register(&mut store, "Reader", "reader@example.com").await;
    let blog = publish(&mut store, &author, "Scenario", "body").await;

    let fetched = blogs::get_blog_by_id(&mut store, &blog.id).await.unwrap().unwrap();
    assert_eq!(fetched.total_likes, 0);

    let session = session_for(&reader);
    interactions::like_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 1);

    interactions::unlike_blog(&mut store, Some(&session), &blog.id).await.unwrap();
    assert_eq!(blogs::total_likes(&mut store, &blog.id).await.unwrap(), 0);
}

#[tokio::test]
async fn upload_urls_require_a_session() {
    let mut blobs_store = MemoryBlobStore::new();
    let err = blogs::generate_upload_url(&mut blobs_store, None).await.unwrap_err();
    assert_eq!(err.to_string(), "User not authenticated");
}
