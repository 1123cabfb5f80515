//! Employee Repository

use super::{Db, RepoError, RepoResult, next_id};
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: Db,
}

impl EmployeeRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Employee>> {
        Ok(self.db.tables.employees.read().get(&id).cloned())
    }

    pub fn find_by_code(&self, code: &str) -> RepoResult<Option<Employee>> {
        Ok(self
            .db
            .tables
            .employees
            .read()
            .values()
            .find(|e| e.code == code)
            .cloned())
    }

    /// All active employees, id order.
    pub fn find_active(&self) -> RepoResult<Vec<Employee>> {
        Ok(self
            .db
            .tables
            .employees
            .read()
            .values()
            .filter(|e| e.is_active)
            .cloned()
            .collect())
    }

    pub fn create(&self, data: EmployeeCreate, now: NaiveDateTime) -> RepoResult<Employee> {
        let mut employees = self.db.tables.employees.write();

        // Employee code is the business unique key
        if employees.values().any(|e| e.code == data.code) {
            return Err(RepoError::Duplicate(format!(
                "Employee code already exists: {}",
                data.code
            )));
        }

        let id = next_id(&employees);
        let employee = Employee {
            id: Some(id),
            code: data.code,
            name: data.name,
            phone: data.phone,
            email: data.email,
            department: data.department,
            position: data.position,
            hire_date: data.hire_date,
            face_encoding: None,
            monthly_salary: data.monthly_salary,
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        };
        employees.insert(id, employee.clone());
        Ok(employee)
    }

    pub fn update(&self, id: i64, data: EmployeeUpdate, now: NaiveDateTime) -> RepoResult<Employee> {
        let mut employees = self.db.tables.employees.write();
        let employee = employees
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;

        if let Some(name) = data.name {
            employee.name = name;
        }
        if let Some(phone) = data.phone {
            employee.phone = Some(phone);
        }
        if let Some(email) = data.email {
            employee.email = Some(email);
        }
        if let Some(department) = data.department {
            employee.department = Some(department);
        }
        if let Some(position) = data.position {
            employee.position = Some(position);
        }
        if let Some(salary) = data.monthly_salary {
            employee.monthly_salary = salary;
        }
        if let Some(active) = data.is_active {
            employee.is_active = active;
        }
        employee.updated_at = Some(now);
        Ok(employee.clone())
    }

    /// Store the persisted form of a face encoding (ordered JSON float array).
    pub fn set_face_encoding(
        &self,
        id: i64,
        encoding_json: String,
        now: NaiveDateTime,
    ) -> RepoResult<()> {
        let mut employees = self.db.tables.employees.write();
        let employee = employees
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
        employee.face_encoding = Some(encoding_json);
        employee.updated_at = Some(now);
        Ok(())
    }

    /// Soft delete: the row stays so attendance/payroll history keeps its
    /// employee reference.
    pub fn soft_delete(&self, id: i64, now: NaiveDateTime) -> RepoResult<()> {
        let mut employees = self.db.tables.employees.write();
        let employee = employees
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
        employee.is_active = false;
        employee.updated_at = Some(now);
        Ok(())
    }
}
