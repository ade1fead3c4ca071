use crate::model::task::Priority;

/// Display metadata for one priority level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityOption {
    pub value: Priority,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const PRIORITIES: [PriorityOption; 3] = [
    PriorityOption { value: Priority::Low, label: "Low", icon: "low_priority", color: "green" },
    PriorityOption { value: Priority::Medium, label: "Medium", icon: "remove", color: "yellow" },
    PriorityOption { value: Priority::High, label: "High", icon: "priority_high", color: "red" },
];

pub fn priority_option(priority: Priority) -> &'static PriorityOption {
    // PRIORITIES is indexed by the wire value.
    &PRIORITIES[priority.value() as usize]
}
