use super::support::*;

use inkstream::PageStatus;

#[tokio::test]
async fn feed_pages_walk_the_whole_index() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    for n in 0..5 {
        publish(&mut store, &author, &format!("Post {n}"), "body").await;
    }

    let first = blogs::get_paginated_blogs(&mut store, &PageRequest::first(2)).await.unwrap();
    assert_eq!(first.page.len(), 2);
    assert_eq!(first.status, PageStatus::CanLoadMore);

    let second = blogs::get_paginated_blogs(&mut store, &PageRequest::after(first.continue_cursor.clone(), 2))
        .await
        .unwrap();
    assert_eq!(second.page.len(), 2);
    assert_eq!(second.status, PageStatus::CanLoadMore);

    let third = blogs::get_paginated_blogs(&mut store, &PageRequest::after(second.continue_cursor.clone(), 2))
        .await
        .unwrap();
    assert_eq!(third.page.len(), 1);
    assert!(third.is_done);
    assert_eq!(third.status, PageStatus::Exhausted);

    let mut seen: Vec<&str> = first
        .page
        .iter()
        .chain(second.page.iter())
        .chain(third.page.iter())
        .map(|b| b.name.as_str())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn popular_orders_by_like_counter() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    let quiet = publish(&mut store, &author, "Quiet", "body").await;
    let middling = publish(&mut store, &author, "Middling", "body").await;
    let hit = publish(&mut store, &author, "Hit", "body").await;

    for n in 0..2 {
        let reader = register(&mut store, "Reader", &format!("reader{n}@example.com")).await;
        let session = session_for(&reader);
        interactions::like_blog(&mut store, Some(&session), &hit.id).await.unwrap();
        if n == 0 {
            interactions::like_blog(&mut store, Some(&session), &middling.id).await.unwrap();
        }
    }

    let page = blogs::get_popular_blogs(&mut store, &PageRequest::first(10)).await.unwrap();
    let ids: Vec<&str> = page.page.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![hit.id.as_str(), middling.id.as_str(), quiet.id.as_str()]);
}

#[tokio::test]
async fn search_ranks_title_hits_before_content_hits() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    publish(&mut store, &author, "Gardening weekly", "tomatoes and rust removal").await;
    let title_hit = publish(&mut store, &author, "Rust patterns", "ownership explained").await;
    publish(&mut store, &author, "Cooking", "nothing relevant").await;

    let results = blogs::search_blogs(&mut store, "RUST").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, title_hit.id);
    assert_eq!(results[1].name, "Gardening weekly");
}

#[tokio::test]
async fn blank_search_terms_match_nothing() {
    let mut store = MemoryStore::new();
    let author = register(&mut store, "Author", "author@example.com").await;
    publish(&mut store, &author, "Anything", "at all").await;

    assert!(blogs::search_blogs(&mut store, "").await.unwrap().is_empty());
    assert!(blogs::search_blogs(&mut store, "   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn author_listing_filters_by_author() {
    let mut store = MemoryStore::new();
    let alice = register(&mut store, "Alice", "alice@example.com").await;
    let bob = register(&mut store, "Bob", "bob@example.com").await;
    publish(&mut store, &alice, "Hers", "body").await;
    publish(&mut store, &bob, "His", "body").await;
    publish(&mut store, &alice, "Hers again", "body").await;

    let all = blogs::get_all_blogs(&mut store).await.unwrap();
    assert_eq!(all.len(), 3);

    let hers = blogs::get_blogs_by_author(&mut store, &alice.id).await.unwrap();
    assert_eq!(hers.len(), 2);
    assert!(hers.iter().all(|b| b.author_id == alice.id));
}

#[tokio::test]
async fn counter_reads_on_missing_blogs_are_not_found() {
    let mut store = MemoryStore::new();
    let err = blogs::total_likes(&mut store, "missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Blog not found");
    let err = blogs::total_saved(&mut store, "missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Blog not found");
}

#[tokio::test]
async fn malformed_cursors_are_rejected() {
    let mut store = MemoryStore::new();
    let err = blogs::get_paginated_blogs(&mut store, &PageRequest::after("garbage", 10))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("malformed pagination cursor"));
}
