//! Composite project create/update authorization.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use capacity_core::{AppError, AppResult};
use capacity_entity::department::Department;
use capacity_entity::project::{DepartmentStageConfig, Project, ProjectBudget};

use super::department::can_edit_department;
use super::payload::{HOURS_EPSILON, ProjectPayload, StageSignature, as_comparable};
use crate::identity::AccessTier;

/// Stored state of a project, loaded before an update is authorized.
#[derive(Debug, Clone, Copy)]
pub struct CurrentProjectState<'a> {
    /// The project row.
    pub project: &'a Project,
    /// Every stage row of the project.
    pub stages: &'a [DepartmentStageConfig],
    /// Every budget row of the project.
    pub budgets: &'a [ProjectBudget],
}

impl CurrentProjectState<'_> {
    fn shared_fields(&self) -> [(&'static [&'static str], Option<String>); 7] {
        let p = self.project;
        [
            (&["name"], Some(p.name.clone()).filter(|s| !s.is_empty())),
            (&["client"], Some(p.client.clone()).filter(|s| !s.is_empty())),
            (&["start_date", "startDate"], Some(p.start_date.to_string())),
            (&["end_date", "endDate"], Some(p.end_date.to_string())),
            (&["facility"], Some(p.facility.as_str().to_string())),
            (
                &["number_of_weeks", "numberOfWeeks"],
                Some(p.number_of_weeks.to_string()),
            ),
            (
                &["project_manager_id", "projectManagerId"],
                p.project_manager_id.map(|id| id.to_string()),
            ),
        ]
    }

    fn stage_signatures(&self) -> BTreeMap<Department, Vec<StageSignature>> {
        let mut signatures: BTreeMap<Department, Vec<StageSignature>> = BTreeMap::new();
        for row in self.stages {
            signatures.entry(row.department).or_default().push((
                row.stage.map(|s| s.as_str().to_string()),
                i64::from(row.week_start),
                i64::from(row.week_end),
                row.department_start_date.map(|d| d.to_string()),
            ));
        }
        for entries in signatures.values_mut() {
            entries.sort();
        }
        signatures
    }

    fn hours_allocated(&self, dept: Department) -> f64 {
        self.budgets
            .iter()
            .find(|b| b.department == dept)
            .map(|b| b.hours_allocated)
            .unwrap_or(0.0)
    }

    fn visible_departments(&self) -> BTreeSet<Department> {
        self.project.visible_in_departments.0.iter().copied().collect()
    }
}

/// Whether any shared field present in the payload differs from the stored value.
pub fn shared_fields_modified(current: &CurrentProjectState<'_>, payload: &ProjectPayload<'_>) -> bool {
    current.shared_fields().into_iter().any(|(keys, stored)| {
        payload
            .first_present(keys)
            .is_some_and(|incoming| as_comparable(incoming) != stored)
    })
}

/// Departments whose data the payload would change.
///
/// A present stage object replaces all stage rows, so a stored department
/// missing from it counts as changed.
pub fn changed_departments(
    current: &CurrentProjectState<'_>,
    payload: &ProjectPayload<'_>,
) -> BTreeSet<Department> {
    let mut changed = BTreeSet::new();

    if let Some(incoming) = payload.stage_signatures() {
        let stored = current.stage_signatures();
        changed.extend(stored.keys().filter(|d| !incoming.contains_key(d)));
        for (dept, signature) in &incoming {
            let existing = stored.get(dept).map(Vec::as_slice).unwrap_or_default();
            if signature.as_slice() != existing {
                changed.insert(*dept);
            }
        }
    }

    if let Some(hours) = payload.hours_allocated() {
        for (dept, incoming) in hours {
            if (incoming - current.hours_allocated(dept)).abs() > HOURS_EPSILON {
                changed.insert(dept);
            }
        }
    }

    if let Some(visible) = payload.visible_departments() {
        let stored = current.visible_departments();
        changed.extend(visible.symmetric_difference(&stored).copied());
    }

    changed
}

/// Authorize creating a project from `payload`.
pub fn authorize_project_create(tier: &AccessTier, payload: &ProjectPayload<'_>) -> AppResult<()> {
    match tier {
        AccessTier::FullAccess | AccessTier::BusinessIntelligence => return Ok(()),
        AccessTier::ReadOnly { .. } => {
            return Err(AppError::forbidden("No permission to modify projects."));
        }
        AccessTier::DepartmentScoped(_) => {}
    }

    let scope = payload.scope_departments();
    if scope.is_empty() {
        debug!(tier = tier.label(), "Project create without department scope denied");
        return Err(AppError::forbidden(
            "No permission to create projects without department scope.",
        ));
    }
    deny_foreign_departments(tier, &scope)
}

/// Authorize updating `current` with `payload`. Nothing is written here.
pub fn authorize_project_update(
    tier: &AccessTier,
    current: &CurrentProjectState<'_>,
    payload: &ProjectPayload<'_>,
) -> AppResult<()> {
    match tier {
        AccessTier::FullAccess | AccessTier::BusinessIntelligence => return Ok(()),
        AccessTier::ReadOnly { .. } => {
            return Err(AppError::forbidden("No permission to modify projects."));
        }
        AccessTier::DepartmentScoped(_) => {}
    }

    if shared_fields_modified(current, payload) {
        debug!(
            tier = tier.label(),
            project_id = %current.project.id,
            "Shared project field change denied"
        );
        return Err(AppError::forbidden(
            "No permission to modify shared project fields.",
        ));
    }

    deny_foreign_departments(tier, &changed_departments(current, payload))
}

fn deny_foreign_departments(tier: &AccessTier, departments: &BTreeSet<Department>) -> AppResult<()> {
    match departments.iter().find(|d| !can_edit_department(tier, **d)) {
        None => Ok(()),
        Some(dept) => {
            debug!(
                tier = tier.label(),
                department = %dept,
                departments = ?departments,
                "Project write outside department scope denied"
            );
            Err(AppError::forbidden(
                "No permission to modify projects for this department.",
            ))
        }
    }
}

/// Convenience for callers holding a raw JSON body.
pub fn payload_of(body: &Value) -> AppResult<ProjectPayload<'_>> {
    ProjectPayload::from_value(body)
        .ok_or_else(|| AppError::validation("Project payload must be a JSON object."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use capacity_core::ErrorKind;
    use capacity_entity::project::{Facility, Stage};
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;
    use uuid::Uuid;

    const PRG: AccessTier = AccessTier::DepartmentScoped(Department::Prg);
    const MED: AccessTier = AccessTier::DepartmentScoped(Department::Med);

    fn project(visible: Vec<Department>) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            name: "Line 4".to_string(),
            client: "ACME".to_string(),
            start_date: "2025-01-06".parse().unwrap(),
            end_date: "2025-03-31".parse().unwrap(),
            facility: Facility::Al,
            number_of_weeks: 12,
            project_manager_id: None,
            visible_in_departments: Json(visible),
            is_high_probability: false,
            is_hidden: false,
            hidden_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn stage_row(project_id: Uuid, dept: Department, stage: Stage, start: i32, end: i32) -> DepartmentStageConfig {
        let now = Utc::now();
        DepartmentStageConfig {
            id: Uuid::new_v4(),
            project_id,
            department: dept,
            stage: Some(stage),
            week_start: start,
            week_end: end,
            department_start_date: None,
            duration_weeks: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn budget(project_id: Uuid, dept: Department, hours: f64) -> ProjectBudget {
        let now = Utc::now();
        ProjectBudget {
            id: Uuid::new_v4(),
            project_id,
            department: dept,
            hours_allocated: hours,
            hours_utilized: 0.0,
            hours_forecast: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_budget_for_other_department_denied() {
        let p = project(vec![]);
        let current = CurrentProjectState { project: &p, stages: &[], budgets: &[] };
        let body = json!({"department_hours_allocated": {"MED": 25}});
        let payload = payload_of(&body).unwrap();

        let err = authorize_project_update(&PRG, &current, &payload).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(authorize_project_update(&MED, &current, &payload).is_ok());

        // Only the MED budget row is written.
        let budgets = payload.children().unwrap().budget_hours.unwrap();
        assert_eq!(budgets, vec![(Department::Med, 25.0)]);
    }

    #[test]
    fn test_unchanged_hours_do_not_count() {
        let p = project(vec![]);
        let budgets = [budget(p.id, Department::Med, 25.0)];
        let current = CurrentProjectState { project: &p, stages: &[], budgets: &budgets };
        let body = json!({"department_hours_allocated": {"MED": "25.0000001", "PRG": 8}});
        let payload = payload_of(&body).unwrap();
        assert!(authorize_project_update(&PRG, &current, &payload).is_ok());
    }

    #[test]
    fn test_create_scope_checks() {
        let body = json!({"name": "Line 5", "visible_in_departments": ["MED"]});
        let payload = payload_of(&body).unwrap();
        assert!(authorize_project_create(&PRG, &payload).is_err());
        assert!(authorize_project_create(&MED, &payload).is_ok());

        let unscoped = json!({"name": "Line 5"});
        let err = authorize_project_create(&MED, &payload_of(&unscoped).unwrap()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(authorize_project_create(&AccessTier::FullAccess, &payload_of(&unscoped).unwrap()).is_ok());
    }

    #[test]
    fn test_create_with_zero_hour_budgets() {
        let body = json!({
            "visible_in_departments": ["MED"],
            "department_hours_allocated": {"MED": 100, "HD": 0}
        });
        let payload = payload_of(&body).unwrap();
        assert!(authorize_project_create(&MED, &payload).is_ok());
        let budgets = payload.children().unwrap().budget_hours.unwrap();
        assert_eq!(budgets.len(), 2);
    }

    #[test]
    fn test_read_only_denied() {
        let tier = AccessTier::ReadOnly { employee_editable: &[Department::Med] };
        let p = project(vec![]);
        let current = CurrentProjectState { project: &p, stages: &[], budgets: &[] };
        let body = json!({"visible_in_departments": ["MED"]});
        let payload = payload_of(&body).unwrap();
        assert!(authorize_project_create(&tier, &payload).is_err());
        assert!(authorize_project_update(&tier, &current, &payload).is_err());
    }

    #[test]
    fn test_shared_field_change_denied() {
        let p = project(vec![Department::Med]);
        let current = CurrentProjectState { project: &p, stages: &[], budgets: &[] };

        let same = json!({"name": "Line 4", "numberOfWeeks": "12", "startDate": "2025-01-06", "facility": "AL"});
        assert!(authorize_project_update(&MED, &current, &payload_of(&same).unwrap()).is_ok());

        let renamed = json!({"name": "Line 4b"});
        let err = authorize_project_update(&MED, &current, &payload_of(&renamed).unwrap()).unwrap_err();
        assert_eq!(err.message, "No permission to modify shared project fields.");

        let manager = json!({"project_manager_id": Uuid::new_v4().to_string()});
        assert!(authorize_project_update(&MED, &current, &payload_of(&manager).unwrap()).is_err());

        let cleared = json!({"projectManagerId": ""});
        assert!(authorize_project_update(&MED, &current, &payload_of(&cleared).unwrap()).is_ok());
    }

    #[test]
    fn test_unchanged_stage_payload_is_not_a_change() {
        let p = project(vec![]);
        let stages = [
            stage_row(p.id, Department::Med, Stage::Concept, 1, 4),
            stage_row(p.id, Department::Med, Stage::DetailDesign, 5, 9),
            stage_row(p.id, Department::Prg, Stage::Offline, 3, 6),
        ];
        let current = CurrentProjectState { project: &p, stages: &stages, budgets: &[] };

        // Reordered but identical; PRG rows resent as they are.
        let body = json!({"department_stages": {
            "MED": [
                {"stage": "DETAIL_DESIGN", "weekStart": "5", "weekEnd": 9},
                {"stage": "CONCEPT", "week_start": 1, "week_end": 4}
            ],
            "PRG": [{"stage": "OFFLINE", "week_start": 3, "week_end": 8}]
        }});
        let payload = payload_of(&body).unwrap();
        let changed = changed_departments(&current, &payload);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![Department::Prg]);
        assert!(authorize_project_update(&PRG, &current, &payload).is_ok());
        assert!(authorize_project_update(&MED, &current, &payload).is_err());
    }

    #[test]
    fn test_omitted_stage_department_is_implicit_deletion() {
        let p = project(vec![]);
        let stages = [stage_row(p.id, Department::Hd, Stage::Concept, 1, 4)];
        let current = CurrentProjectState { project: &p, stages: &stages, budgets: &[] };
        let body = json!({"department_stages": {"MED": [{"week_start": 1, "week_end": 2}]}});
        let payload = payload_of(&body).unwrap();
        let changed = changed_departments(&current, &payload);
        assert!(changed.contains(&Department::Hd));
        assert!(authorize_project_update(&MED, &current, &payload).is_err());
    }

    #[test]
    fn test_visibility_symmetric_difference() {
        let p = project(vec![Department::Med, Department::Hd]);
        let current = CurrentProjectState { project: &p, stages: &[], budgets: &[] };
        let body = json!({"visibleInDepartments": ["MED", "BUILD"]});
        let payload = payload_of(&body).unwrap();
        let changed = changed_departments(&current, &payload);
        assert_eq!(
            changed.into_iter().collect::<Vec<_>>(),
            vec![Department::Hd, Department::Build]
        );
        // MFG shares edit rights with BUILD but not with HD.
        let mfg = AccessTier::DepartmentScoped(Department::Mfg);
        assert!(authorize_project_update(&mfg, &current, &payload).is_err());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(payload_of(&json!([1, 2])).is_err());
    }
}
