//! Shift Repository

use super::{Db, RepoError, RepoResult, next_id};
use crate::db::models::{Shift, ShiftCreate, ShiftUpdate};
use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct ShiftRepository {
    db: Db,
}

impl ShiftRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Shift>> {
        Ok(self.db.tables.shifts.read().get(&id).cloned())
    }

    /// Active assignments for one employee, id order.
    pub fn find_active_by_employee(&self, employee_id: i64) -> RepoResult<Vec<Shift>> {
        Ok(self
            .db
            .tables
            .shifts
            .read()
            .values()
            .filter(|s| s.is_active && s.employee_id == Some(employee_id))
            .cloned()
            .collect())
    }

    /// Template rows (no employee owner), active or not.
    pub fn find_templates(&self) -> RepoResult<Vec<Shift>> {
        Ok(self
            .db
            .tables
            .shifts
            .read()
            .values()
            .filter(|s| s.is_template())
            .cloned()
            .collect())
    }

    pub fn create(&self, data: ShiftCreate, now: NaiveDateTime) -> RepoResult<Shift> {
        if data.days_of_week.is_empty() {
            return Err(RepoError::Validation(
                "Shift must cover at least one weekday".into(),
            ));
        }

        let mut shifts = self.db.tables.shifts.write();
        let id = next_id(&shifts);
        let shift = Shift {
            id: Some(id),
            employee_id: data.employee_id,
            name: data.name,
            start_time: data.start_time,
            end_time: data.end_time,
            days_of_week: data.days_of_week,
            description: data.description,
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        };
        shifts.insert(id, shift.clone());
        Ok(shift)
    }

    pub fn update(&self, id: i64, data: ShiftUpdate, now: NaiveDateTime) -> RepoResult<Shift> {
        let mut shifts = self.db.tables.shifts.write();
        let shift = shifts
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))?;

        if let Some(name) = data.name {
            shift.name = name;
        }
        if let Some(start) = data.start_time {
            shift.start_time = start;
        }
        if let Some(end) = data.end_time {
            shift.end_time = end;
        }
        if let Some(days) = data.days_of_week {
            if days.is_empty() {
                return Err(RepoError::Validation(
                    "Shift must cover at least one weekday".into(),
                ));
            }
            shift.days_of_week = days;
        }
        if let Some(description) = data.description {
            shift.description = Some(description);
        }
        shift.updated_at = Some(now);
        Ok(shift.clone())
    }

    /// Soft delete (mark inactive).
    pub fn soft_delete(&self, id: i64, now: NaiveDateTime) -> RepoResult<()> {
        let mut shifts = self.db.tables.shifts.write();
        let shift = shifts
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))?;
        shift.is_active = false;
        shift.updated_at = Some(now);
        Ok(())
    }
}
