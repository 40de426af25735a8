//! Shared project fields read out of a loose JSON body.

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use capacity_auth::policy::ProjectPayload;
use capacity_core::{AppError, AppResult};
use capacity_entity::project::{Facility, ProjectFields};

/// Overlay the shared fields present in `payload` on `base`.
///
/// Without a base (creation) every field except the project manager and the
/// probability flag is required.
pub fn merge_fields(
    payload: &ProjectPayload<'_>,
    base: Option<&ProjectFields>,
) -> AppResult<ProjectFields> {
    let name = text(payload, &["name"])?.or_else(|| base.map(|b| b.name.clone()));
    let client = text(payload, &["client"])?.or_else(|| base.map(|b| b.client.clone()));
    let start_date = date(payload, &["start_date", "startDate"])?.or(base.map(|b| b.start_date));
    let end_date = date(payload, &["end_date", "endDate"])?.or(base.map(|b| b.end_date));
    let facility = match payload.first_present(&["facility"]) {
        Some(Value::String(code)) => Some(code.parse::<Facility>()?),
        Some(Value::Null) | None => base.map(|b| b.facility),
        Some(other) => return Err(AppError::validation(format!("Invalid facility: {other}"))),
    };
    let number_of_weeks = weeks(payload)?.or(base.map(|b| b.number_of_weeks));

    let project_manager_id = match payload.first_present(&["project_manager_id", "projectManagerId"]) {
        None => base.and_then(|b| b.project_manager_id),
        Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(
            s.trim()
                .parse::<Uuid>()
                .map_err(|_| AppError::validation(format!("Invalid project manager: '{s}'")))?,
        ),
        Some(other) => {
            return Err(AppError::validation(format!("Invalid project manager: {other}")));
        }
    };

    let is_high_probability = match payload.first_present(&["is_high_probability", "isHighProbability"]) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => crate::query::parse_bool_flag(Some(s), false),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => base.is_some_and(|b| b.is_high_probability),
    };

    let missing = |field: &str| AppError::validation(format!("The project {field} is required."));
    let fields = ProjectFields {
        name: name.ok_or_else(|| missing("name"))?,
        client: client.ok_or_else(|| missing("client"))?,
        start_date: start_date.ok_or_else(|| missing("start date"))?,
        end_date: end_date.ok_or_else(|| missing("end date"))?,
        facility: facility.ok_or_else(|| missing("facility"))?,
        number_of_weeks: number_of_weeks.ok_or_else(|| missing("number of weeks"))?,
        project_manager_id,
        is_high_probability,
    };
    fields.check()?;
    Ok(fields)
}

fn text(payload: &ProjectPayload<'_>, keys: &[&str]) -> AppResult<Option<String>> {
    match payload.first_present(keys) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Err(AppError::validation(format!(
            "The project {} cannot be blank.",
            keys[0]
        ))),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(AppError::validation(format!("Invalid {}: {other}", keys[0]))),
    }
}

fn date(payload: &ProjectPayload<'_>, keys: &[&str]) -> AppResult<Option<NaiveDate>> {
    match payload.first_present(keys) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid {}: '{s}'", keys[0]))),
        Some(other) => Err(AppError::validation(format!("Invalid {}: {other}", keys[0]))),
    }
}

fn weeks(payload: &ProjectPayload<'_>) -> AppResult<Option<i32>> {
    let invalid = |v: &Value| AppError::validation(format!("Invalid number of weeks: {v}"));
    match payload.first_present(&["number_of_weeks", "numberOfWeeks"]) {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(n)) => n
            .as_i64()
            .and_then(|w| i32::try_from(w).ok())
            .map(Some)
            .ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid(v)),
        Some(other) => Err(invalid(other)),
    }
}
