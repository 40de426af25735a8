//! Loose reading of composite project payloads.
//!
//! Clients send either snake_case or camelCase keys and are not consistent
//! about value types (`"12"` vs `12`). Authorization compares what the client
//! *means*, so every read here normalizes before comparing.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde_json::{Map, Value};

use capacity_core::{AppError, AppResult};
use capacity_entity::department::Department;
use capacity_entity::project::{NewStageConfig, ProjectChildren, Stage};

/// Budget and hour values closer than this are considered equal.
pub const HOURS_EPSILON: f64 = 1e-6;

/// `(stage, week_start, week_end, department_start_date)` of one stage row.
pub type StageSignature = (Option<String>, i64, i64, Option<String>);

const VISIBLE_KEYS: &[&str] = &["visible_in_departments", "visibleInDepartments"];
const STAGE_KEYS: &[&str] = &["department_stages", "departmentStages"];
const HOURS_KEYS: &[&str] = &["department_hours_allocated", "departmentHoursAllocated"];

/// A borrowed view over a project create/update body.
#[derive(Debug, Clone, Copy)]
pub struct ProjectPayload<'a> {
    data: &'a Map<String, Value>,
}

impl<'a> ProjectPayload<'a> {
    /// Wrap a JSON object.
    pub fn new(data: &'a Map<String, Value>) -> Self {
        Self { data }
    }

    /// Wrap any JSON value; non-objects read as an empty payload.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// The raw object.
    pub fn raw(&self) -> &'a Map<String, Value> {
        self.data
    }

    /// Value of the first key that is present, even when it is `null`.
    pub fn first_present(&self, keys: &[&str]) -> Option<&'a Value> {
        first_present(self.data, keys)
    }

    /// Departments of the visibility list, if the list is present.
    pub fn visible_departments(&self) -> Option<BTreeSet<Department>> {
        let list = self.first_present(VISIBLE_KEYS)?.as_array()?;
        Some(list.iter().filter_map(normalize_department).collect())
    }

    /// Per-department stage lists, if the stage object is present.
    pub fn stage_lists(&self) -> Option<BTreeMap<Department, &'a Value>> {
        let stages = self.first_present(STAGE_KEYS)?.as_object()?;
        Some(
            stages
                .iter()
                .filter_map(|(raw, entries)| Department::parse_code(raw).map(|d| (d, entries)))
                .collect(),
        )
    }

    /// Per-department sorted stage signatures, if the stage object is present.
    pub fn stage_signatures(&self) -> Option<BTreeMap<Department, Vec<StageSignature>>> {
        self.stage_lists().map(|lists| {
            lists
                .into_iter()
                .map(|(dept, entries)| (dept, stage_signatures(entries)))
                .collect()
        })
    }

    /// Allocated hours per department, if the hours object is present.
    pub fn hours_allocated(&self) -> Option<BTreeMap<Department, f64>> {
        let hours = self.first_present(HOURS_KEYS)?.as_object()?;
        Some(
            hours
                .iter()
                .filter_map(|(raw, value)| {
                    Department::parse_code(raw).map(|d| (d, coerce_float(Some(value))))
                })
                .collect(),
        )
    }

    /// Departments a create payload declares it touches.
    ///
    /// Visibility plus non-empty stage lists; the hours object is consulted
    /// only when neither names a department.
    pub fn scope_departments(&self) -> BTreeSet<Department> {
        let mut scope = self.visible_departments().unwrap_or_default();

        if let Some(lists) = self.stage_lists() {
            scope.extend(
                lists
                    .into_iter()
                    .filter(|(_, entries)| entries.as_array().is_some_and(|a| !a.is_empty()))
                    .map(|(dept, _)| dept),
            );
        }

        if scope.is_empty() {
            if let Some(hours) = self.hours_allocated() {
                scope.extend(
                    hours
                        .into_iter()
                        .filter(|(_, h)| h.abs() > HOURS_EPSILON)
                        .map(|(dept, _)| dept),
                );
            }
        }

        scope
    }

    /// Build the child rows to persist.
    ///
    /// Stages are a full replacement when a non-empty stage object is sent.
    /// Budgets are upserted for every department key present, zero included.
    pub fn children(&self) -> AppResult<ProjectChildren> {
        Ok(ProjectChildren {
            stages: self.stage_rows()?,
            budget_hours: self.budget_rows()?,
        })
    }

    fn stage_rows(&self) -> AppResult<Option<Vec<NewStageConfig>>> {
        let Some(stages) = self.first_present(STAGE_KEYS).and_then(Value::as_object) else {
            return Ok(None);
        };
        if stages.is_empty() {
            return Ok(None);
        }

        let mut rows = Vec::new();
        for (raw, entries) in stages {
            let Some(department) = Department::parse_code(raw) else {
                continue;
            };
            let Some(entries) = entries.as_array() else {
                continue;
            };
            for entry in entries.iter().filter_map(Value::as_object) {
                if let Some(row) = stage_row(department, entry)? {
                    row.check()?;
                    rows.push(row);
                }
            }
        }
        Ok(Some(rows))
    }

    fn budget_rows(&self) -> AppResult<Option<Vec<(Department, f64)>>> {
        let Some(hours) = self.first_present(HOURS_KEYS).and_then(Value::as_object) else {
            return Ok(None);
        };
        if hours.is_empty() {
            return Ok(None);
        }

        let mut rows = Vec::new();
        for (raw, value) in hours {
            let Some(department) = Department::parse_code(raw) else {
                continue;
            };
            let hours = match value {
                Value::Null => 0.0,
                other => strict_float(other).ok_or_else(|| {
                    AppError::validation(format!("Invalid hours for {department}: {other}"))
                })?,
            };
            if hours < 0.0 || !hours.is_finite() {
                return Err(AppError::validation(format!(
                    "Hours for {department} must be a non-negative number."
                )));
            }
            rows.push((department, hours));
        }
        Ok(Some(rows))
    }
}

fn first_present<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| data.get(*key))
}

fn stage_row(
    department: Department,
    entry: &Map<String, Value>,
) -> AppResult<Option<NewStageConfig>> {
    let week_start = first_present(entry, &["week_start", "weekStart"]).and_then(coerce_int);
    let week_end = first_present(entry, &["week_end", "weekEnd"]).and_then(coerce_int);
    let (Some(week_start), Some(week_end)) = (week_start, week_end) else {
        return Ok(None);
    };
    if week_start == 0 || week_end == 0 {
        return Ok(None);
    }

    let stage = match entry.get("stage").and_then(Value::as_str).map(str::trim) {
        Some(code) if !code.is_empty() => Some(code.parse::<Stage>()?),
        _ => None,
    };

    let department_start_date = match first_present(
        entry,
        &["department_start_date", "departmentStartDate"],
    )
    .and_then(Value::as_str)
    .map(str::trim)
    {
        Some(date) if !date.is_empty() => Some(
            date.parse::<NaiveDate>()
                .map_err(|_| AppError::validation(format!("Invalid stage start date: '{date}'")))?,
        ),
        _ => None,
    };

    let duration_weeks = first_present(entry, &["duration_weeks", "durationWeeks"])
        .and_then(coerce_int)
        .filter(|weeks| *weeks != 0);

    let to_i32 = |value: i64| {
        i32::try_from(value).map_err(|_| AppError::validation("Stage week out of range."))
    };

    Ok(Some(NewStageConfig {
        department,
        stage,
        week_start: to_i32(week_start)?,
        week_end: to_i32(week_end)?,
        department_start_date,
        duration_weeks: duration_weeks.map(to_i32).transpose()?,
    }))
}

/// Parse a department code out of a JSON value; non-strings and unknown codes are `None`.
pub fn normalize_department(value: &Value) -> Option<Department> {
    value.as_str().and_then(Department::parse_code)
}

/// Best-effort float: numbers, numeric strings and booleans; anything else is `0.0`.
pub fn coerce_float(value: Option<&Value>) -> f64 {
    value.and_then(strict_float).unwrap_or(0.0)
}

fn strict_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Canonical comparable form of a payload value.
///
/// `null` and `""` are absent, booleans are lowercase words, everything else
/// is its plain string rendering.
pub fn as_comparable(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Signature of one stage entry, or `None` when its weeks are missing or unparseable.
pub fn stage_entry_signature(entry: &Value) -> Option<StageSignature> {
    let entry = entry.as_object()?;

    let stage = entry.get("stage").and_then(|v| match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });

    let week_start = first_present(entry, &["week_start", "weekStart"])?;
    let week_end = first_present(entry, &["week_end", "weekEnd"])?;
    let week_start = coerce_int(week_start)?;
    let week_end = coerce_int(week_end)?;

    let start_date = first_present(entry, &["department_start_date", "departmentStartDate"])
        .and_then(as_comparable);

    Some((stage, week_start, week_end, start_date))
}

/// Sorted signatures of a stage list; anything but an array yields no entries.
pub fn stage_signatures(entries: &Value) -> Vec<StageSignature> {
    let mut signatures: Vec<StageSignature> = entries
        .as_array()
        .map(|list| list.iter().filter_map(stage_entry_signature).collect())
        .unwrap_or_default();
    signatures.sort();
    signatures
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: &Value) -> ProjectPayload<'_> {
        ProjectPayload::from_value(value).unwrap()
    }

    #[test]
    fn test_first_present_prefers_snake_case() {
        let body = json!({"visible_in_departments": ["med"], "visibleInDepartments": ["HD"]});
        let visible = payload(&body).visible_departments().unwrap();
        assert_eq!(visible.into_iter().collect::<Vec<_>>(), vec![Department::Med]);
    }

    #[test]
    fn test_present_null_shadows_camel_case() {
        let body = json!({"visible_in_departments": null, "visibleInDepartments": ["HD"]});
        assert!(payload(&body).visible_departments().is_none());
    }

    #[test]
    fn test_invalid_departments_are_skipped() {
        let body = json!({"visibleInDepartments": [" prg ", "OTHER", 5, "bogus"]});
        let visible = payload(&body).visible_departments().unwrap();
        assert_eq!(visible.into_iter().collect::<Vec<_>>(), vec![Department::Prg]);
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_float(Some(&json!("12.5"))), 12.5);
        assert_eq!(coerce_float(Some(&json!(3))), 3.0);
        assert_eq!(coerce_float(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_float(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_float(None), 0.0);
    }

    #[test]
    fn test_as_comparable() {
        assert_eq!(as_comparable(&json!("")), None);
        assert_eq!(as_comparable(&Value::Null), None);
        assert_eq!(as_comparable(&json!(true)).as_deref(), Some("true"));
        assert_eq!(as_comparable(&json!(12)).as_deref(), Some("12"));
        assert_eq!(as_comparable(&json!("12")).as_deref(), Some("12"));
    }

    #[test]
    fn test_stage_signatures_sorted_and_lenient() {
        let entries = json!([
            {"stage": "RELEASE", "weekStart": "5", "weekEnd": 8},
            {"stage": "CONCEPT", "week_start": 1, "week_end": 4, "department_start_date": "2025-01-06"},
            {"stage": "DEBUG", "week_start": "x", "week_end": 4},
            {"week_start": null, "week_end": 4},
            "not an object"
        ]);
        let signatures = stage_signatures(&entries);
        assert_eq!(
            signatures,
            vec![
                (Some("CONCEPT".into()), 1, 4, Some("2025-01-06".into())),
                (Some("RELEASE".into()), 5, 8, None),
            ]
        );
        assert!(stage_signatures(&json!("nope")).is_empty());
    }

    #[test]
    fn test_scope_uses_visibility_and_stages_before_hours() {
        let body = json!({
            "visible_in_departments": ["MED"],
            "department_stages": {"HD": [{"week_start": 1, "week_end": 2}], "PRG": []},
            "department_hours_allocated": {"MFG": 40}
        });
        let scope = payload(&body).scope_departments();
        assert_eq!(
            scope.into_iter().collect::<Vec<_>>(),
            vec![Department::Med, Department::Hd]
        );
    }

    #[test]
    fn test_scope_falls_back_to_non_zero_hours() {
        let body = json!({"department_hours_allocated": {"MFG": "40", "HD": 0, "PRG": 0.0000001}});
        let scope = payload(&body).scope_departments();
        assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec![Department::Mfg]);

        let empty = json!({"name": "Line 4"});
        assert!(payload(&empty).scope_departments().is_empty());
    }

    #[test]
    fn test_children_include_zero_hour_budgets() {
        let body = json!({
            "department_hours_allocated": {"MED": 25, "HD": 0, "PRG": null, "XYZ": 10}
        });
        let children = payload(&body).children().unwrap();
        assert!(children.stages.is_none());
        let budgets = children.budget_hours.unwrap();
        assert_eq!(budgets.len(), 3);
        assert!(budgets.contains(&(Department::Hd, 0.0)));
        assert!(budgets.contains(&(Department::Prg, 0.0)));
    }

    #[test]
    fn test_children_reject_negative_hours() {
        let body = json!({"department_hours_allocated": {"MED": -5}});
        assert!(payload(&body).children().is_err());
    }

    #[test]
    fn test_children_stage_rows() {
        let body = json!({
            "departmentStages": {
                "med": [
                    {"stage": "CONCEPT", "weekStart": 1, "weekEnd": 3, "durationWeeks": 3},
                    {"stage": "", "weekStart": 0, "weekEnd": 3}
                ],
                "HD": "not a list"
            }
        });
        let stages = payload(&body).children().unwrap().stages.unwrap();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].department, Department::Med);
        assert_eq!(stages[0].stage, Some(Stage::Concept));
        assert_eq!(stages[0].duration_weeks, Some(3));
    }

    #[test]
    fn test_children_empty_stage_object_keeps_rows() {
        let body = json!({"department_stages": {}});
        assert!(payload(&body).children().unwrap().stages.is_none());
    }

    #[test]
    fn test_children_reject_unknown_stage() {
        let body = json!({"department_stages": {"MED": [{"stage": "NAPPING", "week_start": 1, "week_end": 2}]}});
        assert!(payload(&body).children().is_err());
    }
}
