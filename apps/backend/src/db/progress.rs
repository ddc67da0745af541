//! Enrollment and lesson progress.

use std::collections::HashMap;

use progression_core::{CompletionTally, CourseProgress, PointEvent};
use uuid::Uuid;

use super::points::award_in;
use super::Database;
use crate::error::Result;
use crate::models::*;

impl Database {
    // === Enrollment Repository ===

    /// Enroll a user in a course. Returns false if already enrolled.
    pub async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (user_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, course_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_enrolled(&self, user_id: Uuid, course_id: Uuid) -> Result<bool> {
        let enrolled: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(enrolled)
    }

    // === Lesson Progress Repository ===

    /// Whether a completed progress row exists for the pair
    pub async fn is_lesson_completed(&self, user_id: Uuid, lesson_id: Uuid) -> Result<bool> {
        let completed: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT is_completed
            FROM lesson_progress
            WHERE user_id = $1 AND lesson_id = $2
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(completed.unwrap_or(false))
    }

    /// Mark a lesson complete or incomplete for a user.
    ///
    /// The upsert locks the progress row, so concurrent submissions for the same pair
    /// queue behind each other. The first completion of a pair flips `points_awarded`
    /// and pays `award` in the same transaction; later completions pay nothing.
    pub async fn set_lesson_completion(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
        award: i64,
    ) -> Result<CompletionOutcome> {
        let mut tx = self.pool.begin().await?;

        let mut progress = sqlx::query_as::<_, LessonProgress>(
            r#"
            INSERT INTO lesson_progress (user_id, lesson_id, is_completed, completed_at, updated_at)
            VALUES ($1, $2, $3, CASE WHEN $3 THEN NOW() END, NOW())
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                is_completed = EXCLUDED.is_completed,
                completed_at = CASE
                    WHEN EXCLUDED.is_completed THEN COALESCE(lesson_progress.completed_at, NOW())
                    ELSE NULL
                END,
                updated_at = NOW()
            RETURNING user_id, lesson_id, is_completed, completed_at, points_awarded, updated_at
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(completed)
        .fetch_one(&mut *tx)
        .await?;

        let mut awarded_total = None;
        if completed && !progress.points_awarded {
            let flipped = sqlx::query(
                r#"
                UPDATE lesson_progress
                SET points_awarded = TRUE
                WHERE user_id = $1 AND lesson_id = $2 AND NOT points_awarded
                "#,
            )
            .bind(user_id)
            .bind(lesson_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
                == 1;

            if flipped {
                let total = award_in(&mut tx, user_id, PointEvent::LessonCompleted, award).await?;
                progress.points_awarded = true;
                awarded_total = Some(total);
            }
        }

        tx.commit().await?;

        if let Some(total) = awarded_total {
            tracing::debug!(
                "User {} completed lesson {} for the first time, total {}",
                user_id,
                lesson_id,
                total
            );
        }

        Ok(CompletionOutcome {
            progress,
            awarded_total,
        })
    }

    /// Completion flag for every current lesson of a course, in course order
    pub async fn get_course_lesson_flags(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<LessonFlag>> {
        let flags = sqlx::query_as::<_, LessonFlag>(
            r#"
            SELECT l.id AS lesson_id, COALESCE(lp.is_completed, FALSE) AS is_completed
            FROM modules m
            JOIN lessons l ON l.module_id = m.id
            LEFT JOIN lesson_progress lp ON lp.lesson_id = l.id AND lp.user_id = $1
            WHERE m.course_id = $2
            ORDER BY m.order_index, l.order_index
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(flags)
    }

    /// Course percentage plus the per-lesson map it was computed from
    pub async fn get_course_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<(CourseProgress, HashMap<Uuid, bool>)> {
        let flags = self.get_course_lesson_flags(user_id, course_id).await?;
        let progress =
            CompletionTally::from_flags(flags.iter().map(|f| f.is_completed)).for_course(course_id);
        let lessons = flags
            .into_iter()
            .map(|f| (f.lesson_id, f.is_completed))
            .collect();

        Ok((progress, lessons))
    }

    /// Progress for every course the user is enrolled in, oldest enrollment first
    pub async fn get_enrolled_progress(&self, user_id: Uuid) -> Result<Vec<CourseProgress>> {
        let rows = sqlx::query_as::<_, CourseTallyRow>(
            r#"
            SELECT
                e.course_id,
                COUNT(l.id) FILTER (WHERE lp.is_completed) AS completed_lessons,
                COUNT(l.id) AS total_lessons
            FROM enrollments e
            LEFT JOIN modules m ON m.course_id = e.course_id
            LEFT JOIN lessons l ON l.module_id = m.id
            LEFT JOIN lesson_progress lp ON lp.lesson_id = l.id AND lp.user_id = e.user_id
            WHERE e.user_id = $1
            GROUP BY e.course_id, e.enrolled_at
            ORDER BY e.enrolled_at, e.course_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                CompletionTally::new(r.completed_lessons as u32, r.total_lessons as u32)
                    .for_course(r.course_id)
            })
            .collect())
    }
}
