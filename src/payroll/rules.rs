//! Salary Rule Application (薪资规则计算)
//!
//! Pure functions over a payroll record and one rule. The engine applies
//! rules in repository order; `late_penalty` and `absence_deduction` are
//! overwritten (not summed) by each deduction rule, so the last applicable
//! deduction rule wins for those two fields. That matches the reference
//! behavior the web layer's reports were built against; see DESIGN.md
//! before "fixing" it.

use crate::db::models::{Employee, PayrollRecord, RuleType, SalaryRule};

/// Whether a rule applies to an employee (scope filter).
pub fn rule_applies(rule: &SalaryRule, employee: &Employee) -> bool {
    if rule.applies_to_all {
        return true;
    }

    if let Some(department) = &rule.department_filter
        && employee.department.as_deref() != Some(department.as_str())
    {
        return false;
    }

    if let Some(position) = &rule.position_filter
        && employee.position.as_deref() != Some(position.as_str())
    {
        return false;
    }

    true
}

/// Apply one rule to a payroll record, dispatched by rule type.
pub fn apply_rule(record: &mut PayrollRecord, rule: &SalaryRule, default_overtime_multiplier: f64) {
    match rule.rule_type {
        RuleType::Overtime => apply_overtime(record, rule, default_overtime_multiplier),
        RuleType::Tax => apply_tax(record, rule),
        RuleType::Bonus => apply_bonus(record, rule),
        RuleType::Deduction => apply_deduction(record, rule),
    }
}

/// Override the default overtime pay with the rule's multiplier.
fn apply_overtime(record: &mut PayrollRecord, rule: &SalaryRule, default_multiplier: f64) {
    if record.overtime_hours > 0.0 {
        let multiplier = rule.rate_multiplier.unwrap_or(default_multiplier);
        record.overtime_pay = record.overtime_hours * record.hourly_rate * multiplier;
    }
}

/// Percentage takes precedence over a fixed amount when both are set.
fn apply_tax(record: &mut PayrollRecord, rule: &SalaryRule) {
    if let Some(percentage) = rule.percentage {
        let gross_before_tax = record.regular_pay + record.overtime_pay + record.bonus;
        record.tax_deduction = gross_before_tax * (percentage / 100.0);
    } else if let Some(fixed) = rule.fixed_amount {
        record.tax_deduction = fixed;
    }
}

/// Bonuses accumulate across rules.
fn apply_bonus(record: &mut PayrollRecord, rule: &SalaryRule) {
    if let Some(fixed) = rule.fixed_amount {
        record.bonus += fixed;
    } else if let Some(percentage) = rule.percentage {
        let base = record.regular_pay + record.overtime_pay;
        record.bonus += base * (percentage / 100.0);
    }
}

/// General deductions accumulate; late/absence components are overwritten.
fn apply_deduction(record: &mut PayrollRecord, rule: &SalaryRule) {
    if let Some(fixed) = rule.fixed_amount {
        record.other_deductions += fixed;
    } else if let Some(percentage) = rule.percentage {
        let base = record.regular_pay + record.overtime_pay;
        record.other_deductions += base * (percentage / 100.0);
    }

    if record.days_late > 0 {
        record.late_penalty = record.days_late as f64 * rule.fixed_amount.unwrap_or(0.0);
    }

    if record.days_absent > 0 {
        let daily_rate = record.hourly_rate * 8.0;
        record.absence_deduction = record.days_absent as f64 * daily_rate;
    }
}
