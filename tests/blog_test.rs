// ABOUTME: Tests for blog post publishing, paged listing, and keyword search
// ABOUTME: Posts are spaced in time so ordering assertions are deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use common::create_test_database;
use goya_server::database::{BlogSort, CreateBlogPostRequest, Database, Page};
use goya_server::errors::ErrorCode;
use goya_server::models::BlogPost;
use tokio::time::sleep;
use uuid::Uuid;

fn post_request(title: &str, description: &str) -> CreateBlogPostRequest {
    CreateBlogPostRequest {
        title: title.into(),
        description: description.into(),
        writer: "Amina Okafor".into(),
        image: None,
    }
}

async fn publish(database: &Database, posts: &[(&str, &str)]) -> Vec<BlogPost> {
    let mut published = Vec::new();
    for (title, description) in posts {
        published.push(
            database
                .blog()
                .create(&post_request(title, description))
                .await
                .unwrap(),
        );
        sleep(Duration::from_millis(5)).await;
    }
    published
}

fn titles(posts: &[BlogPost]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn test_create_and_get_post() {
    let database = create_test_database().await.unwrap();
    let blog = database.blog();

    let created = blog
        .create(&CreateBlogPostRequest {
            image: Some("https://cdn.goya.africa/cover.png".into()),
            ..post_request("  Breaking into data  ", "Where to start")
        })
        .await
        .unwrap();

    assert_eq!(created.title, "Breaking into data");
    let stored = blog.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.writer, "Amina Okafor");
    assert_eq!(
        stored.image.as_deref(),
        Some("https://cdn.goya.africa/cover.png")
    );
    assert!(blog.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_required_fields_and_title_length() {
    let database = create_test_database().await.unwrap();
    let blog = database.blog();

    for request in [
        post_request("", "body"),
        post_request("title", "  "),
        CreateBlogPostRequest {
            writer: String::new(),
            ..post_request("title", "body")
        },
    ] {
        let err = blog.create(&request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    let err = blog
        .create(&post_request(&"x".repeat(256), "body"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // Length counts characters, not bytes
    blog.create(&post_request(&"é".repeat(255), "body"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_orders_by_publication_and_pages() {
    let database = create_test_database().await.unwrap();
    publish(
        &database,
        &[("first", "a"), ("second", "b"), ("third", "c")],
    )
    .await;
    let blog = database.blog();

    let oldest = blog.list(BlogSort::default(), Page::default()).await.unwrap();
    assert_eq!(titles(&oldest), vec!["first", "second", "third"]);

    let newest = blog
        .list(BlogSort::Newest, Page::new(1, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(titles(&newest), vec!["third", "second"]);

    let rest = blog
        .list(BlogSort::Newest, Page::new(2, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(titles(&rest), vec!["first"]);

    let beyond = blog
        .list(BlogSort::Newest, Page::new(3, 2).unwrap())
        .await
        .unwrap();
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn test_search_matches_title_or_description_newest_first() {
    let database = create_test_database().await.unwrap();
    publish(
        &database,
        &[
            ("Rust for beginners", "Ownership explained"),
            ("Career change", "From teaching to RUST services"),
            ("Design systems", "Tokens and components"),
        ],
    )
    .await;
    let blog = database.blog();

    let found = blog.search("rust", Page::default()).await.unwrap();
    assert_eq!(titles(&found), vec!["Career change", "Rust for beginners"]);

    let none = blog.search("kubernetes", Page::default()).await.unwrap();
    assert!(none.is_empty());

    let err = blog.search("   ", Page::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let database = create_test_database().await.unwrap();
    publish(
        &database,
        &[("50% off mentoring", "spring promo"), ("5000 learners", "milestone")],
    )
    .await;

    let found = database
        .blog()
        .search("50%", Page::default())
        .await
        .unwrap();
    assert_eq!(titles(&found), vec!["50% off mentoring"]);

    let found = database
        .blog()
        .search("_", Page::default())
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_delete_post() {
    let database = create_test_database().await.unwrap();
    let posts = publish(&database, &[("short lived", "gone soon")]).await;
    let blog = database.blog();

    assert!(blog.delete(posts[0].id).await.unwrap());
    assert!(!blog.delete(posts[0].id).await.unwrap());
    assert!(blog.get(posts[0].id).await.unwrap().is_none());
}
