//! Enumerations and field types for task management.
//!
//! This module defines the structured values shared by the store, the views and
//! both user interfaces: account roles, the canonical task status, priorities,
//! sort options and the names of form fields used in validation messages.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Role of an authenticated account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Employee,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Employee => "employee",
        }
    }
}

/// Canonical task status. Exactly one per task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    New,
    #[value(alias = "in-progress")]
    Active,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Every status, in the order the status pickers cycle through them.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::New,
        TaskStatus::Active,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    /// Display label. Status sorting compares these labels.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::New => "New",
            TaskStatus::Active => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
        }
    }
}

/// Task priority. Tasks stored without one are treated as `Medium`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortField {
    Date,
    Employee,
    Status,
    Priority,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Employee => "Employee",
            SortField::Status => "Status",
            SortField::Priority => "Priority",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Email,
    Password,
    Employee,
    Title,
    Description,
    Date,
    Category,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Email => "Email",
            FormField::Password => "Password",
            FormField::Employee => "Employee",
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Date => "Date",
            FormField::Category => "Category",
        }
    }
}

/// Categories offered by the task creation form. Stored categories are free text.
pub const CATEGORIES: [&str; 13] = [
    "Design",
    "Development",
    "Testing",
    "Documentation",
    "Deployment",
    "Research",
    "Meeting",
    "Frontend",
    "Backend",
    "DevOps",
    "Bug Fix",
    "SEO",
    "Performance",
];
