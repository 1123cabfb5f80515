//! Salary Rule Repository

use super::{Db, RepoResult, next_id};
use crate::db::models::SalaryRule;

#[derive(Debug, Clone)]
pub struct SalaryRuleRepository {
    db: Db,
}

impl SalaryRuleRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn create(&self, mut rule: SalaryRule) -> RepoResult<SalaryRule> {
        let mut rules = self.db.tables.salary_rules.write();
        let id = next_id(&rules);
        rule.id = Some(id);
        rules.insert(id, rule.clone());
        Ok(rule)
    }

    /// Active rules in id (insertion) order, the order the payroll engine
    /// applies them in.
    pub fn find_active(&self) -> RepoResult<Vec<SalaryRule>> {
        Ok(self
            .db
            .tables
            .salary_rules
            .read()
            .values()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }
}
