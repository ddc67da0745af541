//! Enrollment and lesson progress API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use tokio::task::JoinSet;
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

async fn enroll(server: &TestServer, token: &str, course_id: Uuid) {
    let response = server
        .post(&format!("/api/courses/{}/enroll", course_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .await;
    response.assert_status_ok();
}

async fn set_completed(
    server: &TestServer,
    token: &str,
    lesson_id: Uuid,
    completed: bool,
) -> serde_json::Value {
    let response = server
        .put(&format!("/api/lessons/{}/progress", lesson_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .json(&fixtures::completion_request(completed))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn course_percent(server: &TestServer, token: &str, course_id: Uuid) -> serde_json::Value {
    let response = server
        .get(&format!("/api/courses/{}/progress", course_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Test enrolling twice reports the second call as a no-op.
#[tokio::test]
#[ignore = "requires database"]
async fn test_enroll_is_idempotent() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[1]).await;

    let mut flags = Vec::new();
    for _ in 0..2 {
        let response = server
            .post(&format!("/api/courses/{}/enroll", seeded.course.id))
            .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        flags.push(body["newly_enrolled"].as_bool().unwrap());
    }
    assert_eq!(flags, vec![true, false]);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test percent complete climbs as lessons across modules are completed.
#[tokio::test]
#[ignore = "requires database"]
async fn test_course_percent_progression() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[2, 2]).await;
    enroll(&server, &token, seeded.course.id).await;

    let progress = course_percent(&server, &token, seeded.course.id).await;
    assert_eq!(progress["percent"], 0);
    assert_eq!(progress["total_lessons"], 4);

    let mut percents = Vec::new();
    for lesson_id in seeded.lesson_ids() {
        let body = set_completed(&server, &token, lesson_id, true).await;
        assert_eq!(body["points_awarded"], 20);

        let progress = course_percent(&server, &token, seeded.course.id).await;
        assert_eq!(progress["lessons"][lesson_id.to_string()], true);
        percents.push(progress["percent"].as_u64().unwrap());
    }
    assert_eq!(percents, vec![25, 50, 75, 100]);
    assert_eq!(ctx.db.get_points_total(student_id).await.unwrap(), 80);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test repeated completion of one lesson pays only once.
#[tokio::test]
#[ignore = "requires database"]
async fn test_completion_awards_once() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[1]).await;
    let lesson_id = seeded.lessons[0][0].id;
    enroll(&server, &token, seeded.course.id).await;

    let first = set_completed(&server, &token, lesson_id, true).await;
    assert_eq!(first["points_awarded"], 20);
    assert_eq!(first["total_points"], 20);
    assert_eq!(first["progress"]["is_completed"], true);

    let second = set_completed(&server, &token, lesson_id, true).await;
    assert_eq!(second["points_awarded"], 0);
    assert!(second.get("total_points").is_none());

    // Un-completing and completing again does not pay a second time
    let undone = set_completed(&server, &token, lesson_id, false).await;
    assert_eq!(undone["progress"]["is_completed"], false);
    assert!(undone["progress"]["completed_at"].is_null());

    let redone = set_completed(&server, &token, lesson_id, true).await;
    assert_eq!(redone["points_awarded"], 0);
    assert_eq!(redone["progress"]["is_completed"], true);

    assert_eq!(ctx.db.get_points_total(student_id).await.unwrap(), 20);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test concurrent completions of the same lesson pay exactly one award.
#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_completion_awards_once() {
    let ctx = TestContext::new().await;
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, _) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[1]).await;
    let lesson_id = seeded.lessons[0][0].id;
    ctx.db.enroll(student_id, seeded.course.id).await.unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let db = ctx.db.clone();
        tasks.spawn(async move {
            db.set_lesson_completion(student_id, lesson_id, true, 20)
                .await
                .unwrap()
                .awarded_total
                .is_some()
        });
    }

    let mut paid = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap() {
            paid += 1;
        }
    }

    assert_eq!(paid, 1);
    assert_eq!(ctx.db.get_points_total(student_id).await.unwrap(), 20);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test a course without lessons reports zero percent.
#[tokio::test]
#[ignore = "requires database"]
async fn test_empty_course_is_zero_percent() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[0]).await;
    enroll(&server, &token, seeded.course.id).await;

    let progress = course_percent(&server, &token, seeded.course.id).await;
    assert_eq!(progress["percent"], 0);
    assert_eq!(progress["total_lessons"], 0);
    assert_eq!(progress["completed_lessons"], 0);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test deleting a completed lesson shrinks both sides of the ratio.
#[tokio::test]
#[ignore = "requires database"]
async fn test_percent_follows_lesson_deletion() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[3]).await;
    let ids = seeded.lesson_ids();
    enroll(&server, &token, seeded.course.id).await;

    set_completed(&server, &token, ids[0], true).await;
    let progress = course_percent(&server, &token, seeded.course.id).await;
    assert_eq!(progress["percent"], 33);

    ctx.db.delete_lesson(ids[1]).await.unwrap();
    let progress = course_percent(&server, &token, seeded.course.id).await;
    assert_eq!(progress["percent"], 50);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test progress requires enrollment and an existing lesson.
#[tokio::test]
#[ignore = "requires database"]
async fn test_completion_errors() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let seeded = ctx.seed_course(instructor_id, &[1]).await;

    let response = server
        .put(&format!("/api/lessons/{}/progress", seeded.lessons[0][0].id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::completion_request(true))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .put(&format!("/api/lessons/{}/progress", Uuid::new_v4()))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::completion_request(true))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    assert_eq!(ctx.db.get_points_total(student_id).await.unwrap(), 0);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}

/// Test the overview lists every enrolled course.
#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_overview() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (instructor_id, _) = ctx.create_test_user("instructor").await;
    let (student_id, token) = ctx.create_test_user("student").await;
    let first = ctx.seed_course(instructor_id, &[2]).await;
    let second = ctx.seed_course(instructor_id, &[1]).await;
    enroll(&server, &token, first.course.id).await;
    enroll(&server, &token, second.course.id).await;

    set_completed(&server, &token, first.lessons[0][0].id, true).await;

    let response = server
        .get("/api/progress")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let courses = body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 2);

    let percent_for = |course_id: Uuid| {
        courses
            .iter()
            .find(|c| c["course_id"] == course_id.to_string())
            .map(|c| c["percent"].as_u64().unwrap())
    };
    assert_eq!(percent_for(first.course.id), Some(50));
    assert_eq!(percent_for(second.course.id), Some(0));

    let response = server
        .get(&format!("/api/lessons/{}/progress", first.lessons[0][0].id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert_eq!(status["completed"], true);

    // Cleanup
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(instructor_id).await;
}
