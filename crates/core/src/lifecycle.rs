//! The request lifecycle state machine.
//!
//! Legal transitions:
//!
//! ```text
//! PENDING ──► APPROVED ──► FULFILLED (terminal)
//!    │
//!    └─────► REJECTED (terminal)
//! ```
//!
//! [`transition_rule`] is the single table mapping `(current, target)` to a
//! [`TransitionRule`] or a validation error; callers never re-derive legality
//! with ad-hoc conditionals. Each rule names the [`TransitionGate`] that must
//! pass and whether the transition deducts stock. The deduction itself is a
//! conditional decrement owned by the db crate; this module only decides that
//! it must happen.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Lifecycle status of a request. Distinct from the PENDING *role*, which
/// quarantines an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Fulfilled,
    ];

    /// The uppercase wire/storage form of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Fulfilled => "FULFILLED",
        }
    }

    /// REJECTED and FULFILLED accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Fulfilled)
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RequestStatus::Pending),
            "APPROVED" => Ok(RequestStatus::Approved),
            "REJECTED" => Ok(RequestStatus::Rejected),
            "FULFILLED" => Ok(RequestStatus::Fulfilled),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may trigger a given transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionGate {
    /// The FACULTY user the request targets, or ADMIN/TA.
    TargetedFacultyOrStaff,
    /// ADMIN/TA only. The targeted faculty does not fulfill.
    StaffOnly,
}

/// What a legal transition requires and does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub gate: TransitionGate,
    /// Whether the transition runs the all-or-nothing stock deduction.
    pub deducts_stock: bool,
}

/// Look up the rule for moving a request from `current` to `target`.
///
/// Returns `CoreError::Validation` for every illegal pair. PENDING is never a
/// valid *target*; requests enter PENDING only at creation.
pub fn transition_rule(
    current: RequestStatus,
    target: RequestStatus,
) -> Result<TransitionRule, CoreError> {
    use RequestStatus::{Approved, Fulfilled, Pending, Rejected};

    match (current, target) {
        (_, Pending) => Err(CoreError::Validation(
            "PENDING is not a valid target status".to_string(),
        )),
        (Pending, Approved) | (Pending, Rejected) => Ok(TransitionRule {
            gate: TransitionGate::TargetedFacultyOrStaff,
            deducts_stock: false,
        }),
        (Pending, Fulfilled) => Err(CoreError::Validation(
            "A request must be approved before it can be fulfilled".to_string(),
        )),
        (Approved, Fulfilled) => Ok(TransitionRule {
            gate: TransitionGate::StaffOnly,
            deducts_stock: true,
        }),
        (Approved, Approved) | (Approved, Rejected) => Err(CoreError::Validation(format!(
            "An approved request can only move to FULFILLED, not {target}"
        ))),
        (Rejected, _) | (Fulfilled, _) => Err(CoreError::Validation(format!(
            "Request is {current}; no further transitions are possible"
        ))),
    }
}

/// Evaluate a gate for a caller against the request's targeted faculty.
pub fn gate_allows(
    gate: TransitionGate,
    role: Role,
    caller_id: DbId,
    target_faculty_id: DbId,
) -> bool {
    match gate {
        TransitionGate::TargetedFacultyOrStaff => {
            role.is_staff() || (role == Role::Faculty && caller_id == target_faculty_id)
        }
        TransitionGate::StaffOnly => role.is_staff(),
    }
}

/// A request may be deleted by its owner or by staff, and only while PENDING.
/// The status check is the caller's responsibility (it is a validation error,
/// not an authorization error).
pub fn can_delete(role: Role, caller_id: DbId, owner_id: DbId) -> bool {
    role.is_staff() || caller_id == owner_id
}

/// Validate the shape of a new request before anything touches the store:
/// non-empty project title, non-empty item list, positive quantities, and no
/// duplicate component within one request.
pub fn validate_new_request(project_title: &str, items: &[(DbId, i32)]) -> Result<(), String> {
    if project_title.trim().is_empty() {
        return Err("projectTitle is required".to_string());
    }
    if items.is_empty() {
        return Err("A request must contain at least one item".to_string());
    }
    for &(component_id, quantity) in items {
        if quantity <= 0 {
            return Err(format!(
                "Quantity for component {component_id} must be positive"
            ));
        }
    }
    for (i, &(component_id, _)) in items.iter().enumerate() {
        if items[..i].iter().any(|&(other, _)| other == component_id) {
            return Err(format!(
                "Component {component_id} appears more than once in the request"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("DONE".parse::<RequestStatus>().is_err());
        assert!("pending".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Fulfilled.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
    }

    /// The full 4x4 transition grid: exactly three pairs are legal.
    #[test]
    fn test_transition_grid_exhaustive() {
        use RequestStatus::{Approved, Fulfilled, Pending, Rejected};

        for current in RequestStatus::ALL {
            for target in RequestStatus::ALL {
                let legal = matches!(
                    (current, target),
                    (Pending, Approved) | (Pending, Rejected) | (Approved, Fulfilled)
                );
                assert_eq!(
                    transition_rule(current, target).is_ok(),
                    legal,
                    "transition {current} -> {target}"
                );
            }
        }
    }

    #[test]
    fn test_pending_decisions_gated_on_targeted_faculty_or_staff() {
        for target in [RequestStatus::Approved, RequestStatus::Rejected] {
            let rule = transition_rule(RequestStatus::Pending, target).unwrap();
            assert_eq!(rule.gate, TransitionGate::TargetedFacultyOrStaff);
            assert!(!rule.deducts_stock, "approval must not touch stock");
        }
    }

    #[test]
    fn test_fulfillment_is_staff_only_and_deducts() {
        let rule = transition_rule(RequestStatus::Approved, RequestStatus::Fulfilled).unwrap();
        assert_eq!(rule.gate, TransitionGate::StaffOnly);
        assert!(rule.deducts_stock);
    }

    #[test]
    fn test_pending_to_fulfilled_is_rejected() {
        let err = transition_rule(RequestStatus::Pending, RequestStatus::Fulfilled).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_targeted_faculty_gate() {
        let gate = TransitionGate::TargetedFacultyOrStaff;

        // The targeted faculty member passes; an unrelated faculty does not.
        assert!(gate_allows(gate, Role::Faculty, 7, 7));
        assert!(!gate_allows(gate, Role::Faculty, 8, 7));

        // Staff always pass, even when not targeted.
        assert!(gate_allows(gate, Role::Admin, 1, 7));
        assert!(gate_allows(gate, Role::Ta, 2, 7));

        // The requesting student never decides their own request.
        assert!(!gate_allows(gate, Role::Student, 7, 7));
        assert!(!gate_allows(gate, Role::Pending, 7, 7));
    }

    #[test]
    fn test_staff_only_gate_excludes_targeted_faculty() {
        let gate = TransitionGate::StaffOnly;

        assert!(gate_allows(gate, Role::Admin, 1, 7));
        assert!(gate_allows(gate, Role::Ta, 2, 7));
        // Even the faculty the request targets cannot fulfill.
        assert!(!gate_allows(gate, Role::Faculty, 7, 7));
        assert!(!gate_allows(gate, Role::Student, 3, 7));
    }

    #[test]
    fn test_delete_guard() {
        // Owner may delete their own request.
        assert!(can_delete(Role::Student, 5, 5));
        // Someone else's request: only staff.
        assert!(!can_delete(Role::Student, 5, 6));
        assert!(!can_delete(Role::Faculty, 5, 6));
        assert!(can_delete(Role::Admin, 5, 6));
        assert!(can_delete(Role::Ta, 5, 6));
    }

    #[test]
    fn test_new_request_validation() {
        assert!(validate_new_request("Robot arm", &[(1, 2), (2, 1)]).is_ok());

        assert!(validate_new_request("", &[(1, 2)]).is_err());
        assert!(validate_new_request("   ", &[(1, 2)]).is_err());
        assert!(validate_new_request("Robot arm", &[]).is_err());
        assert!(validate_new_request("Robot arm", &[(1, 0)]).is_err());
        assert!(validate_new_request("Robot arm", &[(1, -3)]).is_err());

        let err = validate_new_request("Robot arm", &[(1, 2), (1, 1)]).unwrap_err();
        assert!(err.contains("more than once"));
    }
}
