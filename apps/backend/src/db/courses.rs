//! Courses, modules and lessons, including their sibling ordering.
//!
//! Every write that touches `order_index` locks the parent row first (the course for
//! modules, the module for lessons), so appends, deletes and reorders on the same
//! collection run one at a time and always leave indices at `0..n`.

use std::collections::HashMap;

use progression_core::ordering::{append_index, positions, validate_reorder};
use sqlx::PgConnection;
use uuid::Uuid;

use super::Database;
use crate::error::{ApiError, Result};
use crate::models::*;

impl Database {
    // === Course Repository ===

    /// Create a course owned by `instructor_id`
    pub async fn create_course(
        &self,
        instructor_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (id, instructor_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, instructor_id, title, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(instructor_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// Get course by ID
    pub async fn get_course(&self, course_id: Uuid) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, instructor_id, title, description, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Delete a course; modules, lessons, enrollments and progress cascade
    pub async fn delete_course(&self, course_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a module together with its course and instructor
    pub async fn get_module_owner(&self, module_id: Uuid) -> Result<Option<ModuleOwner>> {
        let owner = sqlx::query_as::<_, ModuleOwner>(
            r#"
            SELECT m.id AS module_id, m.course_id, c.instructor_id
            FROM modules m
            JOIN courses c ON c.id = m.course_id
            WHERE m.id = $1
            "#,
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    /// Get a lesson together with its module, course and instructor
    pub async fn get_lesson_owner(&self, lesson_id: Uuid) -> Result<Option<LessonOwner>> {
        let owner = sqlx::query_as::<_, LessonOwner>(
            r#"
            SELECT l.id AS lesson_id, l.module_id, m.course_id, c.instructor_id
            FROM lessons l
            JOIN modules m ON m.id = l.module_id
            JOIN courses c ON c.id = m.course_id
            WHERE l.id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    /// Modules of a course by `order_index`, each with its lessons by `order_index`
    pub async fn get_modules_with_lessons(&self, course_id: Uuid) -> Result<Vec<ModuleWithLessons>> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, course_id, title, order_index, created_at
            FROM modules
            WHERE course_id = $1
            ORDER BY order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT l.id, l.module_id, l.title, l.content, l.order_index, l.created_at
            FROM lessons l
            JOIN modules m ON m.id = l.module_id
            WHERE m.course_id = $1
            ORDER BY l.module_id, l.order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_module: HashMap<Uuid, Vec<Lesson>> = HashMap::new();
        for lesson in lessons {
            by_module.entry(lesson.module_id).or_default().push(lesson);
        }

        Ok(modules
            .into_iter()
            .map(|module| ModuleWithLessons {
                lessons: by_module.remove(&module.id).unwrap_or_default(),
                module,
            })
            .collect())
    }

    // === Module Repository ===

    /// Append a module at the end of the course
    pub async fn create_module(&self, course_id: Uuid, title: &str) -> Result<Module> {
        let mut tx = self.pool.begin().await?;
        lock_course(&mut tx, course_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modules WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&mut *tx)
            .await?;

        let module = sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (id, course_id, title, order_index)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, title, order_index, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(course_id)
        .bind(title)
        .bind(append_index(count))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(module)
    }

    /// Delete a module and close the gap it leaves in the course order
    pub async fn delete_module(&self, module_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let course_id: Option<Uuid> =
            sqlx::query_scalar("SELECT course_id FROM modules WHERE id = $1")
                .bind(module_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(course_id) = course_id else {
            return Ok(false);
        };
        lock_course(&mut tx, course_id).await?;

        let removed: Option<i32> =
            sqlx::query_scalar("DELETE FROM modules WHERE id = $1 RETURNING order_index")
                .bind(module_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(removed) = removed else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            UPDATE modules
            SET order_index = order_index - 1
            WHERE course_id = $1 AND order_index > $2
            "#,
        )
        .bind(course_id)
        .bind(removed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a complete new module order for a course.
    ///
    /// `ordered_ids` must be a permutation of the course's modules; otherwise nothing is
    /// written and `OrderMismatch` is returned.
    pub async fn reorder_modules(&self, course_id: Uuid, ordered_ids: &[Uuid]) -> Result<Vec<Module>> {
        let mut tx = self.pool.begin().await?;
        lock_course(&mut tx, course_id).await?;

        let current: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM modules WHERE course_id = $1 ORDER BY order_index",
        )
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;

        validate_reorder(&current, ordered_ids)?;

        let (ids, indices) = positions(ordered_ids);
        sqlx::query(
            r#"
            UPDATE modules AS m
            SET order_index = v.order_index
            FROM UNNEST($1::uuid[], $2::int[]) AS v(id, order_index)
            WHERE m.id = v.id AND m.course_id = $3
            "#,
        )
        .bind(&ids)
        .bind(&indices)
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, course_id, title, order_index, created_at
            FROM modules
            WHERE course_id = $1
            ORDER BY order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(modules)
    }

    // === Lesson Repository ===

    /// Append a lesson at the end of the module
    pub async fn create_lesson(&self, module_id: Uuid, title: &str, content: &str) -> Result<Lesson> {
        let mut tx = self.pool.begin().await?;
        lock_module(&mut tx, module_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE module_id = $1")
            .bind(module_id)
            .fetch_one(&mut *tx)
            .await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (id, module_id, title, content, order_index)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, module_id, title, content, order_index, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(module_id)
        .bind(title)
        .bind(content)
        .bind(append_index(count))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lesson)
    }

    /// Delete a lesson and close the gap it leaves in the module order
    pub async fn delete_lesson(&self, lesson_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let module_id: Option<Uuid> =
            sqlx::query_scalar("SELECT module_id FROM lessons WHERE id = $1")
                .bind(lesson_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(module_id) = module_id else {
            return Ok(false);
        };
        lock_module(&mut tx, module_id).await?;

        let removed: Option<i32> =
            sqlx::query_scalar("DELETE FROM lessons WHERE id = $1 RETURNING order_index")
                .bind(lesson_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(removed) = removed else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            UPDATE lessons
            SET order_index = order_index - 1
            WHERE module_id = $1 AND order_index > $2
            "#,
        )
        .bind(module_id)
        .bind(removed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a complete new lesson order for a module
    pub async fn reorder_lessons(&self, module_id: Uuid, ordered_ids: &[Uuid]) -> Result<Vec<Lesson>> {
        let mut tx = self.pool.begin().await?;
        lock_module(&mut tx, module_id).await?;

        let current: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM lessons WHERE module_id = $1 ORDER BY order_index",
        )
        .bind(module_id)
        .fetch_all(&mut *tx)
        .await?;

        validate_reorder(&current, ordered_ids)?;

        let (ids, indices) = positions(ordered_ids);
        sqlx::query(
            r#"
            UPDATE lessons AS l
            SET order_index = v.order_index
            FROM UNNEST($1::uuid[], $2::int[]) AS v(id, order_index)
            WHERE l.id = v.id AND l.module_id = $3
            "#,
        )
        .bind(&ids)
        .bind(&indices)
        .bind(module_id)
        .execute(&mut *tx)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, module_id, title, content, order_index, created_at
            FROM lessons
            WHERE module_id = $1
            ORDER BY order_index
            "#,
        )
        .bind(module_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lessons)
    }
}

/// Take the row lock that serializes writes to a course's module order
async fn lock_course(conn: &mut PgConnection, course_id: Uuid) -> Result<()> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
        .bind(course_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", course_id)))?;
    Ok(())
}

/// Take the row lock that serializes writes to a module's lesson order
async fn lock_module(conn: &mut PgConnection, module_id: Uuid) -> Result<()> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM modules WHERE id = $1 FOR UPDATE")
        .bind(module_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {}", module_id)))?;
    Ok(())
}
