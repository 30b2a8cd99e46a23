// ABOUTME: Tests for the student admission waitlist
// ABOUTME: Covers the default status, listing order, and one-shot approve/reject decisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use common::{create_test_database, create_test_student};
use goya_server::errors::ErrorCode;
use goya_server::models::StudentStatus;
use tokio::time::sleep;
use uuid::Uuid;

#[tokio::test]
async fn test_new_students_start_on_waitlist() {
    let database = create_test_database().await.unwrap();
    let student = create_test_student(&database).await.unwrap();

    assert_eq!(student.status, StudentStatus::Waitlist);
    let stored = database.students().get(student.id).await.unwrap().unwrap();
    assert_eq!(stored.status, StudentStatus::Waitlist);
}

#[tokio::test]
async fn test_waitlist_lists_only_undecided_students_oldest_first() {
    let database = create_test_database().await.unwrap();
    let first = create_test_student(&database).await.unwrap();
    sleep(Duration::from_millis(5)).await;
    let decided = create_test_student(&database).await.unwrap();
    sleep(Duration::from_millis(5)).await;
    let last = create_test_student(&database).await.unwrap();

    database
        .students()
        .resolve_waitlist(decided.id, StudentStatus::Approved)
        .await
        .unwrap();

    let waitlist = database.students().list_waitlist().await.unwrap();
    let ids: Vec<Uuid> = waitlist.iter().map(|p| p.student.id).collect();
    assert_eq!(ids, vec![first.id, last.id]);
}

#[tokio::test]
async fn test_approve_and_reject_record_the_decision() {
    let database = create_test_database().await.unwrap();
    let approved = create_test_student(&database).await.unwrap();
    let rejected = create_test_student(&database).await.unwrap();

    let students = database.students();
    let result = students
        .resolve_waitlist(approved.id, StudentStatus::Approved)
        .await
        .unwrap();
    assert_eq!(result.status, StudentStatus::Approved);

    let result = students
        .resolve_waitlist(rejected.id, StudentStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(result.status, StudentStatus::Rejected);

    assert!(students.list_waitlist().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_decided_student_cannot_be_decided_again() {
    let database = create_test_database().await.unwrap();
    let student = create_test_student(&database).await.unwrap();
    let students = database.students();

    students
        .resolve_waitlist(student.id, StudentStatus::Rejected)
        .await
        .unwrap();
    let err = students
        .resolve_waitlist(student.id, StudentStatus::Approved)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceConflict);
    assert!(err.message.contains("REJECTED"));
    let stored = students.get(student.id).await.unwrap().unwrap();
    assert_eq!(stored.status, StudentStatus::Rejected);
}

#[tokio::test]
async fn test_waitlist_decision_errors() {
    let database = create_test_database().await.unwrap();
    let student = create_test_student(&database).await.unwrap();
    let students = database.students();

    let err = students
        .resolve_waitlist(Uuid::new_v4(), StudentStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let err = students
        .resolve_waitlist(student.id, StudentStatus::Waitlist)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}
