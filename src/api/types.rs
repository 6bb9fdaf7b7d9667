//! API request and response types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::db::entities::{employee, project};

// ============================================================================
// Request Types
// ============================================================================

/// POST /api/projects and PUT /api/projects/{id} request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default)]
    pub project_id: i32,
    pub name: String,
    #[serde(deserialize_with = "datetime_flex::required")]
    pub start_date: NaiveDateTime,
    #[serde(default, deserialize_with = "datetime_flex::optional")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub project_employees: Vec<ProjectEmployeeInput>,
}

/// Accepts both `2024-01-01T09:00:00` and bare `2024-01-01` (midnight) in
/// project date fields.
mod datetime_flex {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer};

    fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        s.parse::<NaiveDateTime>()
            .or_else(|_| s.parse::<NaiveDate>().map(|d| NaiveDateTime::new(d, NaiveTime::MIN)))
    }

    pub fn required<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| parse(&s).map_err(serde::de::Error::custom)).transpose()
    }
}

/// Team membership entry in a project payload. `employee` carries the fields
/// a new employee row is created from when `employeeId` matches no row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEmployeeInput {
    pub employee_id: i32,
    pub employee: Option<EmployeeInput>,
}

/// POST /api/employees and PUT /api/employees/{id} request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(default)]
    pub employee_id: i32,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub department: String,
}

/// Query params for project search
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub project_name: Option<String>,
    pub is_in_progress: Option<bool>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Project with its team
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub project_id: i32,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub employees: Vec<EmployeeResponse>,
}

impl ProjectResponse {
    pub fn with_employees(project: project::Model, employees: Vec<employee::Model>) -> Self {
        Self {
            project_id: project.id,
            name: project.name,
            start_date: project.start_date,
            end_date: project.end_date,
            employees: employees.into_iter().map(EmployeeResponse::from).collect(),
        }
    }
}

/// Project without its team, for reverse lookups
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: i32,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
}

impl From<project::Model> for ProjectSummary {
    fn from(project: project::Model) -> Self {
        Self {
            project_id: project.id,
            name: project.name,
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub employee_id: i32,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub department: String,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(employee: employee::Model) -> Self {
        Self {
            employee_id: employee.id,
            name: employee.name,
            date_of_birth: employee.date_of_birth,
            department: employee.department,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_response_wire_names() {
        let response = ProjectResponse {
            project_id: 7,
            name: "Website Revamp".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            end_date: None,
            employees: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["projectId"], 7);
        assert_eq!(json["name"], "Website Revamp");
        assert_eq!(json["startDate"], "2024-01-01T00:00:00");
        assert!(json["endDate"].is_null());
    }

    #[test]
    fn test_project_input_nested_employees() {
        let input: ProjectInput = serde_json::from_str(
            r#"{
                "name": "Apollo",
                "startDate": "2024-05-01T08:30:00",
                "endDate": null,
                "projectEmployees": [
                    {"employeeId": 3},
                    {
                        "employeeId": 0,
                        "employee": {
                            "name": "Riley",
                            "dateOfBirth": "1993-02-11",
                            "department": "Design"
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(input.project_id, 0);
        assert_eq!(input.project_employees.len(), 2);
        assert!(input.project_employees[0].employee.is_none());
        let nested = input.project_employees[1].employee.as_ref().unwrap();
        assert_eq!(nested.department, "Design");
    }

    #[test]
    fn test_project_input_without_links() {
        let input: ProjectInput =
            serde_json::from_str(r#"{"name": "Solo", "startDate": "2024-01-01T00:00:00"}"#).unwrap();
        assert!(input.project_employees.is_empty());
        assert!(input.end_date.is_none());
    }

    #[test]
    fn test_project_input_date_only() {
        let input: ProjectInput = serde_json::from_str(
            r#"{"name": "Solo", "startDate": "2024-01-01", "endDate": "2024-06-30"}"#,
        )
        .unwrap();
        assert_eq!(
            input.start_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            input.end_date.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
    }
}
