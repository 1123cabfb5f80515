//! Payroll Engine (工资核算)
//!
//! Turns a period's attendance data into payroll records. Recalculation is
//! idempotent: the record for an (employee, period) pair is keyed upsert, so
//! running a period twice converges on the same numbers instead of stacking.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::core::{Clock, Config};
use crate::db::models::{PayrollPeriod, PayrollRecord, PayrollStatus, PeriodStatus};
use crate::db::repository::{
    AttendanceRepository, EmployeeRepository, PayrollRepository, SalaryRuleRepository,
};
use crate::payroll::rules::{apply_rule, rule_applies};
use crate::payroll::statistics::WorkStatistics;
use crate::utils::time::round2;
use crate::utils::validation::validate_non_negative;
use crate::utils::{AppError, AppResult};

/// 周期批量核算结果
///
/// A period run never aborts on a single employee's failure; the errors are
/// collected so the caller can report them alongside the tally.
#[derive(Debug, Clone, Default)]
pub struct PeriodRunOutcome {
    pub processed: usize,
    pub failed: usize,
    pub errors: Vec<(i64, String)>,
}

/// 周期汇总 (报表用)
#[derive(Debug, Clone)]
pub struct PayrollSummary {
    pub period: PayrollPeriod,
    pub employee_count: usize,
    pub total_hours: f64,
    pub total_gross: f64,
    pub total_deductions: f64,
    pub total_net: f64,
}

#[derive(Clone)]
pub struct PayrollService {
    payroll: PayrollRepository,
    attendance: AttendanceRepository,
    employees: EmployeeRepository,
    rules: SalaryRuleRepository,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl PayrollService {
    pub fn new(
        payroll: PayrollRepository,
        attendance: AttendanceRepository,
        employees: EmployeeRepository,
        rules: SalaryRuleRepository,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            payroll,
            attendance,
            employees,
            rules,
            clock,
            config,
        }
    }

    pub fn create_period(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<PayrollPeriod> {
        let period = self
            .payroll
            .create_period(name.to_string(), start_date, end_date, self.clock.now())?;
        info!(
            period_id = period.id,
            name = %period.name,
            "Payroll period created"
        );
        Ok(period)
    }

    /// 单个员工工资核算
    ///
    /// Statistics from the period's attendance, base pay from the salary
    /// snapshot, then the active rules in repository order. Safe to re-run.
    pub fn calculate_employee_payroll(
        &self,
        employee_id: i64,
        period_id: i64,
    ) -> AppResult<PayrollRecord> {
        let period = self
            .payroll
            .find_period(period_id)?
            .ok_or_else(|| AppError::not_found(format!("Payroll period {period_id} not found")))?;
        let employee = self
            .employees
            .find_by_id(employee_id)?
            .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

        if self.config.monthly_hours <= 0.0 {
            return Err(AppError::calculation(
                "MONTHLY_HOURS must be positive".to_string(),
            ));
        }
        validate_non_negative(employee.monthly_salary, "Monthly salary")?;

        let records = self.attendance.find_by_employee_in_range(
            employee_id,
            period.start_date,
            period.end_date,
        )?;
        let stats = WorkStatistics::from_records(
            &records,
            period.start_date,
            period.end_date,
            self.config.workday_start,
            self.config.standard_day_hours,
        );

        let mut record = PayrollRecord::blank(employee_id, period_id);
        record.total_hours = stats.total_hours;
        record.regular_hours = stats.regular_hours;
        record.overtime_hours = stats.overtime_hours;
        record.days_worked = stats.days_worked;
        record.days_absent = stats.days_absent;
        record.days_late = stats.days_late;

        record.base_salary = employee.monthly_salary;
        record.hourly_rate = employee.monthly_salary / self.config.monthly_hours;
        record.regular_pay = record.regular_hours * record.hourly_rate;
        record.overtime_pay =
            record.overtime_hours * record.hourly_rate * self.config.overtime_multiplier;

        for rule in self.rules.find_active()? {
            if rule_applies(&rule, &employee) {
                apply_rule(&mut record, &rule, self.config.overtime_multiplier);
            }
        }

        record.gross_salary = record.regular_pay + record.overtime_pay + record.bonus;
        record.total_deductions = record.tax_deduction
            + record.insurance_deduction
            + record.other_deductions
            + record.late_penalty
            + record.absence_deduction;
        record.net_salary = record.gross_salary - record.total_deductions;

        record.hourly_rate = round2(record.hourly_rate);
        record.regular_pay = round2(record.regular_pay);
        record.overtime_pay = round2(record.overtime_pay);
        record.bonus = round2(record.bonus);
        record.tax_deduction = round2(record.tax_deduction);
        record.other_deductions = round2(record.other_deductions);
        record.late_penalty = round2(record.late_penalty);
        record.absence_deduction = round2(record.absence_deduction);
        record.gross_salary = round2(record.gross_salary);
        record.total_deductions = round2(record.total_deductions);
        record.net_salary = round2(record.net_salary);

        record.calculated_at = Some(self.clock.now());

        let record = self.payroll.upsert_record(record)?;
        info!(
            employee_id,
            period_id,
            net = record.net_salary,
            "Payroll record calculated"
        );
        Ok(record)
    }

    /// 全周期批量核算
    ///
    /// Runs every active employee, isolating per-employee failures. The
    /// period advances to Processing before and Completed after; re-running
    /// a completed period leaves its status untouched.
    pub fn calculate_period_payroll(&self, period_id: i64) -> AppResult<PeriodRunOutcome> {
        let period = self
            .payroll
            .find_period(period_id)?
            .ok_or_else(|| AppError::not_found(format!("Payroll period {period_id} not found")))?;

        if period.status < PeriodStatus::Processing {
            self.payroll
                .advance_period_status(period_id, PeriodStatus::Processing)?;
        }

        let mut outcome = PeriodRunOutcome::default();
        for employee in self.employees.find_active()? {
            let Some(employee_id) = employee.id else {
                continue;
            };
            match self.calculate_employee_payroll(employee_id, period_id) {
                Ok(_) => outcome.processed += 1,
                Err(err) => {
                    warn!(employee_id, error = %err, "Payroll calculation failed for employee");
                    outcome.failed += 1;
                    outcome.errors.push((employee_id, err.to_string()));
                }
            }
        }

        if period.status < PeriodStatus::Completed {
            self.payroll
                .advance_period_status(period_id, PeriodStatus::Completed)?;
        }

        info!(
            period_id,
            processed = outcome.processed,
            failed = outcome.failed,
            "Payroll period calculated"
        );
        Ok(outcome)
    }

    /// 审批工资记录
    pub fn approve(&self, record_id: i64, approver_id: i64) -> AppResult<PayrollRecord> {
        let mut record = self
            .payroll
            .find_record_by_id(record_id)?
            .ok_or_else(|| AppError::not_found(format!("Payroll record {record_id} not found")))?;

        if record.status == PayrollStatus::Paid {
            return Err(AppError::invalid_input(
                "Paid payroll record cannot be re-approved".to_string(),
            ));
        }

        record.status = PayrollStatus::Approved;
        record.approved_by = Some(approver_id);
        record.approved_at = Some(self.clock.now());
        Ok(self.payroll.update_record(record)?)
    }

    /// 周期汇总
    pub fn period_summary(&self, period_id: i64) -> AppResult<PayrollSummary> {
        let period = self
            .payroll
            .find_period(period_id)?
            .ok_or_else(|| AppError::not_found(format!("Payroll period {period_id} not found")))?;
        let records = self.payroll.find_records_by_period(period_id)?;

        let mut summary = PayrollSummary {
            period,
            employee_count: records.len(),
            total_hours: 0.0,
            total_gross: 0.0,
            total_deductions: 0.0,
            total_net: 0.0,
        };
        for record in &records {
            summary.total_hours += record.total_hours;
            summary.total_gross += record.gross_salary;
            summary.total_deductions += record.total_deductions;
            summary.total_net += record.net_salary;
        }
        summary.total_hours = round2(summary.total_hours);
        summary.total_gross = round2(summary.total_gross);
        summary.total_deductions = round2(summary.total_deductions);
        summary.total_net = round2(summary.total_net);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::db::models::{AttendanceRecord, AttendanceStatus, EmployeeCreate, RuleType, SalaryRule};
    use crate::db::repository::Db;
    use chrono::{NaiveDate, NaiveDateTime};

    struct Fixture {
        service: PayrollService,
        attendance: AttendanceRepository,
        rules: SalaryRuleRepository,
        employee_id: i64,
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fixture(monthly_salary: f64) -> Fixture {
        let db = Db::open_in_memory();
        let employees = EmployeeRepository::new(db.clone());
        let attendance = AttendanceRepository::new(db.clone());
        let rules = SalaryRuleRepository::new(db.clone());
        let payroll = PayrollRepository::new(db);
        let clock = Arc::new(FixedClock::new(dt("2025-06-09T10:00:00")));

        let employee = employees
            .create(
                EmployeeCreate {
                    code: "EMP001".into(),
                    name: "Alice".into(),
                    phone: None,
                    email: None,
                    department: Some("Kitchen".into()),
                    position: None,
                    hire_date: None,
                    monthly_salary,
                },
                clock.now(),
            )
            .unwrap();

        let service = PayrollService::new(
            payroll,
            attendance.clone(),
            employees,
            rules.clone(),
            clock,
            Config::default(),
        );

        Fixture {
            service,
            attendance,
            rules,
            employee_id: employee.id.unwrap(),
        }
    }

    /// 5 × 9h days across a Mon–Fri week.
    fn seed_week(f: &Fixture) {
        for day in 2..=6 {
            let date = d(&format!("2025-06-{day:02}"));
            let mut record = AttendanceRecord {
                id: None,
                employee_id: f.employee_id,
                shift_id: None,
                date,
                check_in: Some(date.and_hms_opt(9, 0, 0).unwrap()),
                check_out: None,
                total_hours: 0.0,
                overtime_hours: 0.0,
                status: AttendanceStatus::Present,
                notes: None,
                created_at: None,
                updated_at: None,
            };
            record = f.attendance.create_checked_in(record).unwrap();
            record.check_out = Some(date.and_hms_opt(18, 0, 0).unwrap());
            record.total_hours = 9.0;
            f.attendance.update(record).unwrap();
        }
    }

    #[test]
    fn test_base_pay_scenario() {
        // 1600 月薪 → 时薪 10; 45h 对 40h 标准 → 40 正常 + 5 加班
        let f = fixture(1600.0);
        seed_week(&f);
        let period = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap();

        let record = f
            .service
            .calculate_employee_payroll(f.employee_id, period.id.unwrap())
            .unwrap();

        assert_eq!(record.hourly_rate, 10.0);
        assert_eq!(record.regular_hours, 40.0);
        assert_eq!(record.overtime_hours, 5.0);
        assert_eq!(record.regular_pay, 400.0);
        assert_eq!(record.overtime_pay, 75.0); // 5 × 10 × 1.5
        assert_eq!(record.gross_salary, 475.0);
        assert_eq!(record.net_salary, 475.0);
        assert_eq!(record.days_worked, 5);
        assert_eq!(record.days_absent, 0);
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let f = fixture(1600.0);
        seed_week(&f);
        let period_id = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap()
            .id
            .unwrap();

        let first = f
            .service
            .calculate_employee_payroll(f.employee_id, period_id)
            .unwrap();
        let second = f
            .service
            .calculate_employee_payroll(f.employee_id, period_id)
            .unwrap();

        // Same row, same numbers, not a second row with doubled pay
        assert_eq!(first.id, second.id);
        assert_eq!(first.net_salary, second.net_salary);

        let summary = f.service.period_summary(period_id).unwrap();
        assert_eq!(summary.employee_count, 1);
        assert_eq!(summary.total_net, 475.0);
    }

    #[test]
    fn test_rules_applied_in_order() {
        let f = fixture(1600.0);
        seed_week(&f);
        let period_id = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap()
            .id
            .unwrap();

        let base_rule = SalaryRule {
            id: None,
            name: "Weekly Bonus".into(),
            rule_type: RuleType::Bonus,
            threshold_hours: None,
            rate_multiplier: None,
            fixed_amount: Some(25.0),
            percentage: None,
            applies_to_all: true,
            department_filter: None,
            position_filter: None,
            is_active: true,
            created_at: None,
        };
        f.rules.create(base_rule.clone()).unwrap();
        let mut tax = base_rule;
        tax.name = "Flat Tax".into();
        tax.rule_type = RuleType::Tax;
        tax.fixed_amount = None;
        tax.percentage = Some(10.0);
        f.rules.create(tax).unwrap();

        let record = f
            .service
            .calculate_employee_payroll(f.employee_id, period_id)
            .unwrap();

        // Bonus lands before tax, so tax base includes it
        assert_eq!(record.bonus, 25.0);
        assert_eq!(record.tax_deduction, 50.0); // (400 + 75 + 25) × 10%
        assert_eq!(record.gross_salary, 500.0);
        assert_eq!(record.net_salary, 450.0);
    }

    #[test]
    fn test_department_scoped_rule_skipped() {
        let f = fixture(1600.0);
        seed_week(&f);
        let period_id = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap()
            .id
            .unwrap();

        f.rules
            .create(SalaryRule {
                id: None,
                name: "Front Bonus".into(),
                rule_type: RuleType::Bonus,
                threshold_hours: None,
                rate_multiplier: None,
                fixed_amount: Some(100.0),
                percentage: None,
                applies_to_all: false,
                department_filter: Some("Front".into()),
                position_filter: None,
                is_active: true,
                created_at: None,
            })
            .unwrap();

        let record = f
            .service
            .calculate_employee_payroll(f.employee_id, period_id)
            .unwrap();
        assert_eq!(record.bonus, 0.0); // employee is in Kitchen
    }

    #[test]
    fn test_period_run_advances_status_and_isolates() {
        let f = fixture(1600.0);
        seed_week(&f);
        let period_id = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap()
            .id
            .unwrap();

        let outcome = f.service.calculate_period_payroll(period_id).unwrap();
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.failed, 0);

        let summary = f.service.period_summary(period_id).unwrap();
        assert_eq!(summary.period.status, PeriodStatus::Completed);

        // Re-running a completed period is fine and stays completed
        let again = f.service.calculate_period_payroll(period_id).unwrap();
        assert_eq!(again.processed, 1);
        assert_eq!(
            f.service.period_summary(period_id).unwrap().period.status,
            PeriodStatus::Completed
        );
    }

    #[test]
    fn test_approve_stamps_record() {
        let f = fixture(1600.0);
        seed_week(&f);
        let period_id = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap()
            .id
            .unwrap();
        let record = f
            .service
            .calculate_employee_payroll(f.employee_id, period_id)
            .unwrap();

        let approved = f.service.approve(record.id.unwrap(), 99).unwrap();
        assert_eq!(approved.status, PayrollStatus::Approved);
        assert_eq!(approved.approved_by, Some(99));
        assert!(approved.approved_at.is_some());

        // Approval survives recalculation
        let recalc = f
            .service
            .calculate_employee_payroll(f.employee_id, period_id)
            .unwrap();
        assert_eq!(recalc.status, PayrollStatus::Approved);
        assert_eq!(recalc.approved_by, Some(99));
    }

    #[test]
    fn test_unknown_employee_rejected() {
        let f = fixture(1600.0);
        let period_id = f
            .service
            .create_period("June W1", d("2025-06-02"), d("2025-06-06"))
            .unwrap()
            .id
            .unwrap();
        let err = f
            .service
            .calculate_employee_payroll(9999, period_id)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
