//! Satisfaction survey model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Survey {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    pub satisfaction: i16,
    pub comment: Option<String>,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSurvey {
    pub employee_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5))]
    pub satisfaction: i16,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl Survey {
    pub async fn create(pool: &PgPool, data: &CreateSurvey, submitted_by: Uuid) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Survey>(
            r#"
            INSERT INTO surveys (employee_id, satisfaction, comment, submitted_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(data.employee_id)
        .bind(data.satisfaction)
        .bind(&data.comment)
        .bind(submitted_by)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, employee_id: Option<Uuid>, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Survey>(
            r#"
            SELECT * FROM surveys
            WHERE ($1::uuid IS NULL OR employee_id = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#
        )
        .bind(employee_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
