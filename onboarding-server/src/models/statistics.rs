//! Integration statistics

use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// An employee counts as integrated from these ratings up
pub const INTEGRATED_LEADER_MIN: f64 = 4.0;
pub const INTEGRATED_COMPATIBILITY_MIN: f64 = 3.5;

#[derive(Debug, Clone, FromRow)]
pub struct StatisticsRow {
    pub total_employees: i64,
    pub integrated_employees: i64,
    pub avg_leader_satisfaction: Option<f64>,
    pub avg_team_compatibility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationStatistics {
    pub total_employees: i64,
    pub integrated_employees: i64,
    pub integration_percentage: f64,
    pub avg_leader_satisfaction: f64,
    pub avg_team_compatibility: f64,
}

impl From<StatisticsRow> for IntegrationStatistics {
    fn from(row: StatisticsRow) -> Self {
        let percentage = if row.total_employees > 0 {
            row.integrated_employees as f64 / row.total_employees as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_employees: row.total_employees,
            integrated_employees: row.integrated_employees,
            integration_percentage: round2(percentage),
            avg_leader_satisfaction: round2(row.avg_leader_satisfaction.unwrap_or(0.0)),
            avg_team_compatibility: round2(row.avg_team_compatibility.unwrap_or(0.0)),
        }
    }
}

impl IntegrationStatistics {
    pub async fn compute(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, StatisticsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM employees) AS total_employees,
                (SELECT COUNT(*) FROM integration_processes
                    WHERE leader_satisfaction >= $1 AND team_compatibility >= $2) AS integrated_employees,
                (SELECT AVG(leader_satisfaction) FROM integration_processes) AS avg_leader_satisfaction,
                (SELECT AVG(team_compatibility) FROM integration_processes) AS avg_team_compatibility
            "#
        )
        .bind(INTEGRATED_LEADER_MIN)
        .bind(INTEGRATED_COMPATIBILITY_MIN)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_population() {
        let stats = IntegrationStatistics::from(StatisticsRow {
            total_employees: 0,
            integrated_employees: 0,
            avg_leader_satisfaction: None,
            avg_team_compatibility: None,
        });

        assert_eq!(stats.integration_percentage, 0.0);
        assert_eq!(stats.avg_leader_satisfaction, 0.0);
        assert_eq!(stats.avg_team_compatibility, 0.0);
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let stats = IntegrationStatistics::from(StatisticsRow {
            total_employees: 3,
            integrated_employees: 2,
            avg_leader_satisfaction: Some(4.23456),
            avg_team_compatibility: Some(3.999),
        });

        assert_eq!(stats.integration_percentage, 66.67);
        assert_eq!(stats.avg_leader_satisfaction, 4.23);
        assert_eq!(stats.avg_team_compatibility, 4.0);
    }
}
