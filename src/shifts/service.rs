//! Shift Service (班次管理)

use std::sync::Arc;

use chrono::{Duration, NaiveTime, Weekday};
use tracing::info;

use crate::core::{Clock, Config};
use crate::db::models::{Shift, ShiftCreate, ShiftUpdate};
use crate::db::repository::ShiftRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

/// 班次服务
#[derive(Clone)]
pub struct ShiftService {
    repo: ShiftRepository,
    clock: Arc<dyn Clock>,
    late_grace: Duration,
}

impl ShiftService {
    pub fn new(repo: ShiftRepository, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            repo,
            clock,
            late_grace: Duration::minutes(config.late_grace_minutes),
        }
    }

    // ===== Resolver =====

    /// Shift in effect for an employee on a weekday.
    ///
    /// Scans active assignments whose day set contains the weekday. When
    /// several overlap, the earliest start time wins, ties broken by lowest
    /// id, a deterministic rule instead of the accidental insertion-order
    /// dependency the data allows.
    pub fn current_shift(&self, employee_id: i64, weekday: Weekday) -> AppResult<Option<Shift>> {
        let shifts = self.repo.find_active_by_employee(employee_id)?;
        Ok(shifts
            .into_iter()
            .filter(|s| s.covers_day(weekday))
            .min_by_key(|s| (s.start_time, s.id)))
    }

    /// Late iff the check-in is strictly past shift start + grace.
    pub fn is_late(&self, shift: &Shift, check_in: NaiveTime) -> bool {
        check_in > shift.start_time + self.late_grace
    }

    // ===== CRUD =====

    pub fn create(&self, data: ShiftCreate) -> AppResult<Shift> {
        validate_required_text(&data.name, "Shift name", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "Shift description", MAX_NOTE_LEN)?;
        Ok(self.repo.create(data, self.clock.now())?)
    }

    pub fn update(&self, id: i64, data: ShiftUpdate) -> AppResult<Shift> {
        if let Some(name) = &data.name {
            validate_required_text(name, "Shift name", MAX_NAME_LEN)?;
        }
        Ok(self.repo.update(id, data, self.clock.now())?)
    }

    /// Soft delete (mark inactive).
    pub fn delete(&self, id: i64) -> AppResult<()> {
        Ok(self.repo.soft_delete(id, self.clock.now())?)
    }

    pub fn get(&self, id: i64) -> AppResult<Option<Shift>> {
        Ok(self.repo.find_by_id(id)?)
    }

    pub fn templates(&self) -> AppResult<Vec<Shift>> {
        Ok(self.repo.find_templates()?)
    }

    pub fn shifts_for_employee(&self, employee_id: i64) -> AppResult<Vec<Shift>> {
        Ok(self.repo.find_active_by_employee(employee_id)?)
    }

    // ===== Templates =====

    /// Copy a template into a new employee-owned assignment.
    pub fn assign_template(&self, employee_id: i64, template_id: i64) -> AppResult<Shift> {
        let template = self
            .repo
            .find_by_id(template_id)?
            .ok_or_else(|| AppError::not_found(format!("Shift template {template_id} not found")))?;

        if !template.is_template() {
            return Err(AppError::invalid_input(format!(
                "Shift {template_id} is an assignment, not a template"
            )));
        }

        let assignment = self.repo.create(
            ShiftCreate {
                employee_id: Some(employee_id),
                name: template.name.clone(),
                start_time: template.start_time,
                end_time: template.end_time,
                days_of_week: template.days_of_week.clone(),
                description: template.description.clone(),
            },
            self.clock.now(),
        )?;
        info!(employee_id, template_id, shift_id = ?assignment.id, "Shift template assigned");
        Ok(assignment)
    }

    /// Seed the common template set. Idempotent: existing template names
    /// are left alone.
    pub fn seed_default_templates(&self) -> AppResult<Vec<Shift>> {
        let weekdays = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ];
        let presets: Vec<ShiftCreate> = vec![
            ShiftCreate {
                employee_id: None,
                name: "Morning Shift".into(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                days_of_week: weekdays.clone(),
                description: Some("Standard morning shift - 9 AM to 5 PM, Monday to Friday".into()),
            },
            ShiftCreate {
                employee_id: None,
                name: "Evening Shift".into(),
                start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                days_of_week: weekdays.clone(),
                description: Some("Evening shift - 2 PM to 10 PM, Monday to Friday".into()),
            },
            ShiftCreate {
                employee_id: None,
                name: "Night Shift".into(),
                start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                days_of_week: vec![
                    Weekday::Sun,
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                ],
                description: Some("Night shift - 10 PM to 6 AM, Sunday to Thursday".into()),
            },
            ShiftCreate {
                employee_id: None,
                name: "Weekend Shift".into(),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                days_of_week: vec![Weekday::Sat, Weekday::Sun],
                description: Some("Weekend shift - 10 AM to 6 PM, Saturday and Sunday".into()),
            },
        ];

        let existing = self.repo.find_templates()?;
        let mut created = Vec::new();
        for preset in presets {
            if existing.iter().any(|t| t.name == preset.name) {
                continue;
            }
            created.push(self.repo.create(preset, self.clock.now())?);
        }
        Ok(created)
    }
}
