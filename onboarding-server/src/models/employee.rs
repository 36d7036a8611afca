//! Employee model
//!
//! An employee row plus the three optional process sections
//! (recruitment, integration, training), each stored in its own table.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use validator::Validate;

/// Maximum rows returned by the employee list
pub const MAX_LIST_LIMIT: i64 = 100;

// ============================================================================
// INTEGRATION STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationStatus {
    Excellent,
    VeryGood,
    Good,
    InProgress,
}

impl IntegrationStatus {
    /// Band from leader satisfaction and team compatibility (missing = 0)
    pub fn from_ratings(leader: Option<f64>, compatibility: Option<f64>) -> Self {
        let l = leader.unwrap_or(0.0);
        let c = compatibility.unwrap_or(0.0);

        if l >= 4.5 && c >= 4.0 {
            Self::Excellent
        } else if l >= 4.0 && c >= 3.5 {
            Self::VeryGood
        } else if l >= 3.0 && c >= 3.0 {
            Self::Good
        } else {
            Self::InProgress
        }
    }
}

/// Mean of the two ratings as a truncated percentage of the 0-5 scale
pub fn integration_percentage(leader: Option<f64>, compatibility: Option<f64>) -> i32 {
    let mean = (leader.unwrap_or(0.0) + compatibility.unwrap_or(0.0)) / 2.0;
    (mean * 100.0 / 5.0).trunc() as i32
}

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub department: String,
    pub hire_date: Option<NaiveDate>,
    pub contract_type: Option<String>,
    pub seniority_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List row joined with the integration section
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeIntegrationRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub hire_date: Option<NaiveDate>,
    pub days_to_first_project: Option<i32>,
    pub mentor_assigned: Option<bool>,
    pub leader_satisfaction: Option<f64>,
    pub team_compatibility: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub hire_date: Option<NaiveDate>,
    pub days_to_first_project: Option<i32>,
    pub mentor_assigned: bool,
    pub leader_satisfaction: Option<f64>,
    pub team_compatibility: Option<f64>,
    pub integration_status: IntegrationStatus,
    pub integration_percentage: i32,
}

impl From<EmployeeIntegrationRow> for EmployeeSummary {
    fn from(row: EmployeeIntegrationRow) -> Self {
        Self {
            integration_status: IntegrationStatus::from_ratings(row.leader_satisfaction, row.team_compatibility),
            integration_percentage: integration_percentage(row.leader_satisfaction, row.team_compatibility),
            id: row.id,
            name: row.name,
            email: row.email,
            department: row.department,
            hire_date: row.hire_date,
            days_to_first_project: row.days_to_first_project,
            mentor_assigned: row.mentor_assigned.unwrap_or(false),
            leader_satisfaction: row.leader_satisfaction,
            team_compatibility: row.team_compatibility,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeList {
    pub total: usize,
    pub employees: Vec<EmployeeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
pub struct RecruitmentProcess {
    #[validate(range(min = 0, max = 365))]
    pub process_days: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub interview_count: Option<i32>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub interview_rating: Option<f64>,
    pub offer_accepted: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
pub struct IntegrationProcess {
    #[validate(range(min = 0, max = 365))]
    pub days_to_first_project: Option<i32>,
    pub mentor_assigned: Option<bool>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub leader_satisfaction: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub team_compatibility: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub interview_rating: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub induction_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
pub struct TrainingMetrics {
    #[validate(range(min = 0.0, max = 2000.0))]
    pub training_hours: Option<f64>,
    #[validate(range(min = 0, max = 500))]
    pub courses_completed: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub technical_evaluation: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub tools_knowledge: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    pub recruitment: Option<RecruitmentProcess>,
    pub integration: Option<IntegrationProcess>,
    pub training: Option<TrainingMetrics>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 18, max = 100))]
    pub age: Option<i32>,
    #[validate(length(min = 1, max = 16))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 64))]
    pub contract_type: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub seniority_level: Option<String>,

    pub recruitment: Option<RecruitmentProcess>,
    pub integration: Option<IntegrationProcess>,
    pub training: Option<TrainingMetrics>,
}

impl CreateEmployee {
    /// Validate the employee and every section present
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        if let Some(section) = &self.recruitment {
            section.validate()?;
        }
        if let Some(section) = &self.integration {
            section.validate()?;
        }
        if let Some(section) = &self.training {
            section.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// QUERIES
// ============================================================================

const EMPLOYEE_COLUMNS: &str = r#"
    e.id, e.name, e.email, e.age, e.gender,
    COALESCE(d.name, 'N/A') AS department,
    e.hire_date, e.contract_type, e.seniority_level, e.created_at
"#;

impl Employee {
    pub async fn list_with_integration(pool: &PgPool, limit: i64) -> Result<Vec<EmployeeSummary>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmployeeIntegrationRow>(
            r#"
            SELECT
                e.id, e.name, e.email,
                COALESCE(d.name, 'N/A') AS department,
                e.hire_date,
                ip.days_to_first_project,
                ip.mentor_assigned,
                ip.leader_satisfaction,
                ip.team_compatibility
            FROM employees e
            LEFT JOIN departments d ON e.department_id = d.id
            LEFT JOIN integration_processes ip ON ip.employee_id = e.id
            ORDER BY e.created_at, e.id
            LIMIT $1
            "#
        )
        .bind(limit.clamp(1, MAX_LIST_LIMIT))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(EmployeeSummary::from).collect())
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM employees e LEFT JOIN departments d ON e.department_id = d.id WHERE e.id = $1",
            EMPLOYEE_COLUMNS
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    pub async fn detail(pool: &PgPool, id: Uuid) -> Result<Option<EmployeeDetail>, sqlx::Error> {
        let Some(employee) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let recruitment = sqlx::query_as::<_, RecruitmentProcess>(
            "SELECT process_days, interview_count, interview_rating, offer_accepted
             FROM recruitment_processes WHERE employee_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let integration = sqlx::query_as::<_, IntegrationProcess>(
            "SELECT days_to_first_project, mentor_assigned, leader_satisfaction,
                    team_compatibility, interview_rating, induction_score
             FROM integration_processes WHERE employee_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let training = sqlx::query_as::<_, TrainingMetrics>(
            "SELECT training_hours, courses_completed, technical_evaluation, tools_knowledge
             FROM training_metrics WHERE employee_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(Some(EmployeeDetail {
            employee,
            recruitment,
            integration,
            training,
        }))
    }

    /// Insert an employee and its sections in one transaction
    pub async fn create(pool: &PgPool, data: &CreateEmployee) -> Result<EmployeeDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let department_id: Option<Uuid> = match &data.department {
            Some(name) => Some(
                sqlx::query_scalar(
                    r#"
                    INSERT INTO departments (name) VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id
                    "#,
                )
                .bind(name)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO employees (name, email, age, gender, department_id, hire_date, contract_type, seniority_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(data.age)
        .bind(&data.gender)
        .bind(department_id)
        .bind(data.hire_date)
        .bind(&data.contract_type)
        .bind(&data.seniority_level)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(r) = &data.recruitment {
            sqlx::query(
                "INSERT INTO recruitment_processes (employee_id, process_days, interview_count, interview_rating, offer_accepted)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(r.process_days)
            .bind(r.interview_count)
            .bind(r.interview_rating)
            .bind(r.offer_accepted)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(i) = &data.integration {
            sqlx::query(
                "INSERT INTO integration_processes (employee_id, days_to_first_project, mentor_assigned,
                     leader_satisfaction, team_compatibility, interview_rating, induction_score)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(id)
            .bind(i.days_to_first_project)
            .bind(i.mentor_assigned)
            .bind(i.leader_satisfaction)
            .bind(i.team_compatibility)
            .bind(i.interview_rating)
            .bind(i.induction_score)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(t) = &data.training {
            sqlx::query(
                "INSERT INTO training_metrics (employee_id, training_hours, courses_completed, technical_evaluation, tools_knowledge)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(t.training_hours)
            .bind(t.courses_completed)
            .bind(t.technical_evaluation)
            .bind(t.tools_knowledge)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Self::detail(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
    }
}
