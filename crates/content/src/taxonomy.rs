//! Reference data seeded once and read-only afterwards.

use serde::{Deserialize, Serialize};

use portal_auth::Permission;
use portal_core::{CategoryId, DepartmentId, Entity, PositionId, Record};

/// Post category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Presentation hint (CSS class).
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: String,
}

/// Position within a department. Informational: session checks use roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub department_id: DepartmentId,
    pub permissions: Vec<Permission>,
    pub level: u32,
}

impl Category {
    fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    pub fn defaults() -> Vec<Category> {
        vec![
            Category::new("research", "Research", "bg-blue-600"),
            Category::new("briefing", "Briefings", "bg-green-600"),
            Category::new("incident", "Incidents", "bg-red-600"),
            Category::new("protocol", "Protocols", "bg-purple-600"),
        ]
    }
}

impl Department {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: DepartmentId::new(id),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub fn defaults() -> Vec<Department> {
        vec![
            Department::new(
                "administration",
                "Administration",
                "Runs the foundation and coordinates the departments",
            ),
            Department::new(
                "research",
                "Research",
                "Studies anomalies and develops containment methods",
            ),
            Department::new(
                "security",
                "Security",
                "Guards facilities and oversees contained anomalies",
            ),
            Department::new("field", "Field Operations", "Locates and recovers anomalies"),
        ]
    }
}

impl Position {
    fn new(id: &str, name: &str, department: &str, permissions: Vec<Permission>, level: u32) -> Self {
        Self {
            id: PositionId::new(id),
            name: name.to_string(),
            department_id: DepartmentId::new(department),
            permissions,
            level,
        }
    }

    pub fn defaults() -> Vec<Position> {
        use Permission as P;

        vec![
            Position::new("director", "Director", "administration", vec![P::ALL], 10),
            Position::new(
                "senior_researcher",
                "Senior Researcher",
                "research",
                vec![P::READ_ALL, P::CREATE_POST, P::EDIT_POST, P::CREATE_OBJECT, P::EDIT_OBJECT],
                7,
            ),
            Position::new(
                "security_chief",
                "Head of Security",
                "security",
                vec![P::READ_ALL, P::CREATE_POST, P::EDIT_POST],
                7,
            ),
            Position::new("field_agent", "Field Agent", "field", vec![P::READ_ALL, P::CREATE_POST], 5),
            Position::new(
                "researcher",
                "Researcher",
                "research",
                vec![P::READ_ALL, P::CREATE_POST, P::EDIT_OWN_POST],
                4,
            ),
            Position::new("security_officer", "Security Officer", "security", vec![P::READ_ALL], 3),
            Position::new("intern", "Intern", "research", vec![P::READ_PUBLIC], 1),
        ]
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Category {
    const COLLECTION: &'static str = "categories";
}

impl Entity for Department {
    type Id = DepartmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Department {
    const COLLECTION: &'static str = "departments";
}

impl Entity for Position {
    type Id = PositionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Position {
    const COLLECTION: &'static str = "positions";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_position_belongs_to_a_seeded_department() {
        let departments = Department::defaults();
        for position in Position::defaults() {
            assert!(
                departments.iter().any(|d| d.id == position.department_id),
                "{} has unknown department {}",
                position.id,
                position.department_id
            );
        }
    }

    #[test]
    fn position_uses_camel_case_department_key() {
        let json = serde_json::to_value(&Position::defaults()[0]).unwrap();
        assert_eq!(json["departmentId"], "administration");
        assert_eq!(json["permissions"], serde_json::json!(["all"]));
    }

    #[test]
    fn category_ids_are_unique() {
        let mut ids: Vec<_> = Category::defaults().into_iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
