//! Project entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub start_date: DateTime,
    pub end_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_employee::Entity")]
    ProjectEmployees,
}

impl Related<super::project_employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectEmployees.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_employee::Relation::Employee.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_employee::Relation::Project.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
