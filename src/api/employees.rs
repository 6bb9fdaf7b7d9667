//! Employee handlers: CRUD and reverse project lookup.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, ModelTrait, Set};

use super::types::{EmployeeInput, EmployeeResponse, ProjectSummary};
use super::AppState;
use crate::db::entities::{employee, project};
use crate::error::{Result, ServerError};

/// GET /api/employees - List all employees
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EmployeeResponse>>> {
    let employees = employee::Entity::find().all(&state.db).await?;

    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

/// GET /api/employees/{id} - One employee
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeResponse>> {
    let employee = employee::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::EmployeeNotFound(id))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// POST /api/employees - Create an employee
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EmployeeInput>,
) -> Result<impl IntoResponse> {
    let created = employee::ActiveModel {
        name: Set(input.name),
        date_of_birth: Set(input.date_of_birth),
        department: Set(input.department),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!("Created employee {}", created.id);

    let location = format!("/api/employees/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(EmployeeResponse::from(created)),
    ))
}

/// PUT /api/employees/{id} - Full replace of an employee's fields
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<EmployeeInput>,
) -> Result<StatusCode> {
    if id != input.employee_id {
        return Err(ServerError::IdMismatch {
            path: id,
            body: input.employee_id,
        });
    }

    let replacement = employee::ActiveModel {
        id: Set(id),
        name: Set(input.name),
        date_of_birth: Set(input.date_of_birth),
        department: Set(input.department),
    };

    match replacement.update(&state.db).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(DbErr::RecordNotUpdated) => {
            if employee::Entity::find_by_id(id).one(&state.db).await?.is_some() {
                Err(ServerError::Database(DbErr::RecordNotUpdated))
            } else {
                Err(ServerError::EmployeeNotFound(id))
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/employees/{id} - Remove an employee; link rows cascade
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let employee = employee::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::EmployeeNotFound(id))?;

    employee.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/employees/{id}/projects - Projects an employee is assigned to
pub async fn employee_projects(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ProjectSummary>>> {
    let employee = employee::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::EmployeeNotFound(id))?;

    let projects = employee.find_related(project::Entity).all(&state.db).await?;

    Ok(Json(projects.into_iter().map(ProjectSummary::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::project_employee;
    use chrono::NaiveDate;
    use sea_orm::PaginatorTrait;

    async fn test_state() -> Arc<AppState> {
        let db = crate::db::init_test_database().await.unwrap();
        Arc::new(AppState { db })
    }

    fn employee_input(name: &str, department: &str) -> EmployeeInput {
        EmployeeInput {
            employee_id: 0,
            name: name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            department: department.to_string(),
        }
    }

    async fn create(state: &Arc<AppState>, input: EmployeeInput) -> i32 {
        let response = create_employee(State(state.clone()), Json(input))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["employeeId"].as_i64().unwrap() as i32
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let state = test_state().await;
        let id = create(&state, employee_input("Dana", "Engineering")).await;
        assert!(id > 0);

        let fetched = get_employee(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(fetched.0.name, "Dana");
        assert_eq!(fetched.0.department, "Engineering");

        let missing = get_employee(State(state), Path(id + 1)).await;
        assert!(matches!(missing, Err(ServerError::EmployeeNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_employees() {
        let state = test_state().await;
        create(&state, employee_input("Dana", "Engineering")).await;
        create(&state, employee_input("Sam", "QA")).await;

        let all = list_employees(State(state)).await.unwrap();
        assert_eq!(all.0.len(), 2);
    }

    #[tokio::test]
    async fn test_update_employee() {
        let state = test_state().await;
        let id = create(&state, employee_input("Dana", "Engineering")).await;

        // Mismatched ids are rejected without mutation
        let mut mismatched = employee_input("Renamed", "Design");
        mismatched.employee_id = id + 1;
        let result = update_employee(State(state.clone()), Path(id), Json(mismatched)).await;
        assert!(matches!(result, Err(ServerError::IdMismatch { .. })));

        let mut replacement = employee_input("Dana", "Design");
        replacement.employee_id = id;
        let status = update_employee(State(state.clone()), Path(id), Json(replacement))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let updated = get_employee(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(updated.0.department, "Design");

        let mut ghost = employee_input("Ghost", "Nowhere");
        ghost.employee_id = id + 5;
        let result = update_employee(State(state), Path(id + 5), Json(ghost)).await;
        assert!(matches!(result, Err(ServerError::EmployeeNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_employee_cascades_links() {
        let state = test_state().await;
        let id = create(&state, employee_input("Dana", "Engineering")).await;

        let project = crate::db::entities::project::ActiveModel {
            name: Set("Migration".to_string()),
            start_date: Set(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()),
            end_date: Set(None),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();

        project_employee::ActiveModel {
            project_id: Set(project.id),
            employee_id: Set(id),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();

        let missing = delete_employee(State(state.clone()), Path(id + 1)).await;
        assert!(matches!(missing, Err(ServerError::EmployeeNotFound(_))));

        let status = delete_employee(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let links = project_employee::Entity::find().count(&state.db).await.unwrap();
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn test_employee_projects() {
        let state = test_state().await;
        let id = create(&state, employee_input("Dana", "Engineering")).await;

        let missing = employee_projects(State(state.clone()), Path(id + 1)).await;
        assert!(matches!(missing, Err(ServerError::EmployeeNotFound(_))));

        let none = employee_projects(State(state.clone()), Path(id)).await.unwrap();
        assert!(none.0.is_empty());

        let project = crate::db::entities::project::ActiveModel {
            name: Set("Migration".to_string()),
            start_date: Set(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()),
            end_date: Set(None),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();

        project_employee::ActiveModel {
            project_id: Set(project.id),
            employee_id: Set(id),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();

        let assigned = employee_projects(State(state), Path(id)).await.unwrap();
        assert_eq!(assigned.0.len(), 1);
        assert_eq!(assigned.0[0].name, "Migration");
    }
}
