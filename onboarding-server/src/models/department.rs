//! Department model

use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
pub struct DepartmentList {
    pub departments: Vec<String>,
}

pub struct Department;

impl Department {
    /// Distinct department names, sorted
    pub async fn list_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT name FROM departments WHERE name IS NOT NULL ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
