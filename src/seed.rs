//! Fixture records written to a fresh store.

use crate::auth::Account;
use crate::employee::Employee;
use crate::error::Result;

const EMPLOYEES_JSON: &str = include_str!("../data/employees.json");

/// The five demo employees with their tasks.
pub fn employees() -> Result<Vec<Employee>> {
    Ok(serde_json::from_str(EMPLOYEES_JSON)?)
}

/// Admin accounts.
pub fn admins() -> Vec<Account> {
    vec![Account::new("admin001", "admin@me.com", "123")]
}

/// Plain user accounts. They can log in but own no tasks.
pub fn users() -> Vec<Account> {
    vec![Account::new("user001", "user@me.com", "123")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TaskStatus;

    #[test]
    fn test_fixture_parses() {
        let employees = employees().unwrap();
        let ids: Vec<&str> = employees.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["emp001", "emp002", "emp003", "emp004", "emp005"]);

        let neha = &employees[1];
        assert_eq!(neha.first_name, "Neha");
        assert_eq!(neha.tasks.len(), 4);
        assert_eq!(neha.tasks[1].status, TaskStatus::Completed);
    }
}
