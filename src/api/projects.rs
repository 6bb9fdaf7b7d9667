//! Project handlers: CRUD, search, and team listing.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, ModelTrait, QueryFilter, Set,
};

use super::types::{EmployeeResponse, ProjectInput, ProjectResponse, SearchQuery};
use super::AppState;
use crate::db::entities::{employee, project, project_employee};
use crate::error::{Result, ServerError};

/// GET /api/projects - List all projects with their teams
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let rows = project::Entity::find()
        .find_with_related(employee::Entity)
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(project, team)| ProjectResponse::with_employees(project, team))
            .collect(),
    ))
}

/// GET /api/projects/search - Filter projects by name and progress status
pub async fn search_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let mut select = project::Entity::find();

    if let Some(name) = query.project_name.as_deref() {
        let name = name.trim();
        if !name.is_empty() {
            select = select.filter(project::Column::Name.contains(name));
        }
    }

    if let Some(in_progress) = query.is_in_progress {
        let now = Utc::now().naive_utc();
        select = if in_progress {
            // In progress: no end date yet, or an end date in the future
            select.filter(
                Condition::any()
                    .add(project::Column::EndDate.is_null())
                    .add(project::Column::EndDate.gt(now)),
            )
        } else {
            select.filter(project::Column::EndDate.lt(now))
        };
    }

    let rows = select
        .find_with_related(employee::Entity)
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(project, team)| ProjectResponse::with_employees(project, team))
            .collect(),
    ))
}

/// GET /api/projects/{id} - One project with its team
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ProjectResponse>> {
    let project = project::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ProjectNotFound(id))?;

    let team = project.find_related(employee::Entity).all(&state.db).await?;

    Ok(Json(ProjectResponse::with_employees(project, team)))
}

/// POST /api/projects - Create a project, creating referenced employees that
/// don't exist yet
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse> {
    // Resolve every membership entry to an employee row before touching the
    // project table. Entries referencing an unknown id must carry the fields
    // to create the employee from.
    let mut team = Vec::new();
    let mut seen = HashSet::new();
    for link in &input.project_employees {
        let employee = match employee::Entity::find_by_id(link.employee_id)
            .one(&state.db)
            .await?
        {
            Some(existing) => existing,
            None => {
                let fields = link.employee.as_ref().ok_or_else(|| {
                    ServerError::InvalidRequest(format!(
                        "employee {} does not exist and no employee fields were given",
                        link.employee_id
                    ))
                })?;
                let created = employee::ActiveModel {
                    name: Set(fields.name.clone()),
                    date_of_birth: Set(fields.date_of_birth),
                    department: Set(fields.department.clone()),
                    ..Default::default()
                }
                .insert(&state.db)
                .await?;
                tracing::debug!("Created employee {} for project link", created.id);
                created
            }
        };
        if seen.insert(employee.id) {
            team.push(employee);
        }
    }

    let created = project::ActiveModel {
        name: Set(input.name),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    for member in &team {
        project_employee::ActiveModel {
            project_id: Set(created.id),
            employee_id: Set(member.id),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;
    }

    tracing::info!("Created project {} with {} members", created.id, team.len());

    let location = format!("/api/projects/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProjectResponse::with_employees(created, team)),
    ))
}

/// PUT /api/projects/{id} - Full replace of a project's fields
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<ProjectInput>,
) -> Result<StatusCode> {
    if id != input.project_id {
        return Err(ServerError::IdMismatch {
            path: id,
            body: input.project_id,
        });
    }

    let replacement = project::ActiveModel {
        id: Set(id),
        name: Set(input.name),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
    };

    match replacement.update(&state.db).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(DbErr::RecordNotUpdated) => {
            // The row may have vanished under us; distinguish that from a
            // genuine conflict
            if project::Entity::find_by_id(id).one(&state.db).await?.is_some() {
                Err(ServerError::Database(DbErr::RecordNotUpdated))
            } else {
                Err(ServerError::ProjectNotFound(id))
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/projects/{id} - Remove a project; link rows cascade
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let project = project::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ProjectNotFound(id))?;

    project.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/employees - Flattened team of one project
pub async fn project_employees(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<EmployeeResponse>>> {
    let project = project::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ProjectNotFound(id))?;

    let team = project.find_related(employee::Entity).all(&state.db).await?;

    Ok(Json(team.into_iter().map(EmployeeResponse::from).collect()))
}
