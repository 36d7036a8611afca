//! Onboarding program enrollment model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub enrolled_by: Option<Uuid>,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub employee_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    /// False when the employee was already enrolled
    pub created: bool,
    pub enrollment: Enrollment,
}

impl Enrollment {
    /// Enroll an employee; repeated calls return the existing enrollment
    pub async fn enroll(pool: &PgPool, employee_id: Uuid, enrolled_by: Uuid) -> Result<EnrollResponse, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO onboarding_enrollments (employee_id, enrolled_by)
            VALUES ($1, $2)
            ON CONFLICT (employee_id) DO NOTHING
            "#
        )
        .bind(employee_id)
        .bind(enrolled_by)
        .execute(pool)
        .await?
        .rows_affected();

        let enrollment = Self::find_by_employee(pool, employee_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        Ok(EnrollResponse {
            created: inserted > 0,
            enrollment,
        })
    }

    pub async fn find_by_employee(pool: &PgPool, employee_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT oe.id, oe.employee_id, e.name AS employee_name, oe.enrolled_by, oe.enrolled_at
            FROM onboarding_enrollments oe
            JOIN employees e ON e.id = oe.employee_id
            WHERE oe.employee_id = $1
            "#
        )
        .bind(employee_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT oe.id, oe.employee_id, e.name AS employee_name, oe.enrolled_by, oe.enrolled_at
            FROM onboarding_enrollments oe
            JOIN employees e ON e.id = oe.employee_id
            ORDER BY oe.enrolled_at DESC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
