use serde::{Deserialize, Serialize};

use crate::domain::role::Role;

/// Funnel stage of an enquiry. The wire labels (and the values stored in
/// enquiries.candidate_status) contain spaces, so serde/display renames
/// are explicit per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateStatus {
    #[serde(rename = "demo")]
    Demo,
    #[serde(rename = "qualified demo")]
    QualifiedDemo,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "class qualified")]
    ClassQualified,
    #[serde(rename = "placement")]
    Placement,
    #[serde(rename = "enquiry stage")]
    EnquiryStage,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 6] = [
        CandidateStatus::Demo,
        CandidateStatus::QualifiedDemo,
        CandidateStatus::Class,
        CandidateStatus::ClassQualified,
        CandidateStatus::Placement,
        CandidateStatus::EnquiryStage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Demo => "demo",
            CandidateStatus::QualifiedDemo => "qualified demo",
            CandidateStatus::Class => "class",
            CandidateStatus::ClassQualified => "class qualified",
            CandidateStatus::Placement => "placement",
            CandidateStatus::EnquiryStage => "enquiry stage",
        }
    }

    /// Statuses that count as an active enrollment (classroom access,
    /// student login).
    pub fn is_enrolled(&self) -> bool {
        matches!(self, CandidateStatus::Class | CandidateStatus::ClassQualified)
    }
}

impl Default for CandidateStatus {
    fn default() -> Self {
        CandidateStatus::Demo
    }
}

impl std::str::FromStr for CandidateStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demo" => Ok(CandidateStatus::Demo),
            "qualified demo" => Ok(CandidateStatus::QualifiedDemo),
            "class" => Ok(CandidateStatus::Class),
            "class qualified" => Ok(CandidateStatus::ClassQualified),
            "placement" => Ok(CandidateStatus::Placement),
            "enquiry stage" => Ok(CandidateStatus::EnquiryStage),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl std::fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown candidate status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// Left-hand side of a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromStatus {
    Any,
    Only(CandidateStatus),
}

impl FromStatus {
    fn matches(&self, current: CandidateStatus) -> bool {
        match self {
            FromStatus::Any => true,
            FromStatus::Only(status) => *status == current,
        }
    }
}

/// Roles permitted on a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedRoles {
    AnyAuthenticated,
    Listed(&'static [Role]),
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub from: FromStatus,
    pub to: CandidateStatus,
    pub roles: AllowedRoles,
    pub description: &'static str,
}

const ADMIN_COUNSELLOR: &[Role] = &[Role::Admin, Role::Counsellor];
const ADMIN_ACCOUNTS: &[Role] = &[Role::Admin, Role::Accounts];
const ADMIN_HR: &[Role] = &[Role::Admin, Role::Hr];

/// The authoritative candidate-status transition table. Rules are checked
/// top to bottom and the first (from, to) match governs the role check;
/// there is no fallback row, so any pair not listed here is denied for
/// every role. Keep the ordering: it is part of the contract.
pub static TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: FromStatus::Any,
        to: CandidateStatus::Demo,
        roles: AllowedRoles::Listed(ADMIN_COUNSELLOR),
        description: "move a candidate to demo",
    },
    TransitionRule {
        from: FromStatus::Only(CandidateStatus::Demo),
        to: CandidateStatus::QualifiedDemo,
        roles: AllowedRoles::Listed(ADMIN_COUNSELLOR),
        description: "qualify a demo candidate",
    },
    TransitionRule {
        from: FromStatus::Only(CandidateStatus::QualifiedDemo),
        to: CandidateStatus::Class,
        roles: AllowedRoles::Listed(ADMIN_ACCOUNTS),
        description: "move a qualified demo candidate into class",
    },
    TransitionRule {
        from: FromStatus::Only(CandidateStatus::QualifiedDemo),
        to: CandidateStatus::ClassQualified,
        roles: AllowedRoles::Listed(ADMIN_ACCOUNTS),
        description: "mark a qualified demo candidate as class qualified",
    },
    TransitionRule {
        from: FromStatus::Only(CandidateStatus::Class),
        to: CandidateStatus::ClassQualified,
        roles: AllowedRoles::Listed(ADMIN_ACCOUNTS),
        description: "mark a class candidate as class qualified",
    },
    TransitionRule {
        from: FromStatus::Only(CandidateStatus::ClassQualified),
        to: CandidateStatus::Placement,
        roles: AllowedRoles::Listed(ADMIN_HR),
        description: "move a class qualified candidate to placement",
    },
    TransitionRule {
        from: FromStatus::Only(CandidateStatus::Class),
        to: CandidateStatus::Placement,
        roles: AllowedRoles::Listed(ADMIN_HR),
        description: "move a class candidate to placement",
    },
    TransitionRule {
        from: FromStatus::Any,
        to: CandidateStatus::EnquiryStage,
        roles: AllowedRoles::AnyAuthenticated,
        description: "send a candidate back to enquiry stage",
    },
];

/// Why a transition was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionDenied {
    /// The (from, to) pair exists in the table but the acting role is not
    /// in its allowed set.
    RoleNotAllowed {
        allowed: &'static [Role],
        description: &'static str,
    },
    /// No table row matches the (from, to) pair at all.
    UnsupportedTransition {
        from: CandidateStatus,
        to: CandidateStatus,
    },
}

impl std::fmt::Display for TransitionDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionDenied::RoleNotAllowed { allowed, description } => {
                let roles = allowed
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Only {} can {}", roles, description)
            }
            TransitionDenied::UnsupportedTransition { from, to } => {
                write!(f, "Invalid status transition from {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for TransitionDenied {}

/// Pure decision function over (current, requested, role). Consults nothing
/// but its arguments: no clock, no other enquiry fields, no other records.
pub fn authorize_transition(
    current: CandidateStatus,
    requested: CandidateStatus,
    role: Role,
) -> Result<(), TransitionDenied> {
    for rule in TRANSITIONS {
        if rule.from.matches(current) && rule.to == requested {
            return match rule.roles {
                AllowedRoles::AnyAuthenticated => Ok(()),
                AllowedRoles::Listed(allowed) if allowed.contains(&role) => Ok(()),
                AllowedRoles::Listed(allowed) => Err(TransitionDenied::RoleNotAllowed {
                    allowed,
                    description: rule.description,
                }),
            };
        }
    }

    Err(TransitionDenied::UnsupportedTransition {
        from: current,
        to: requested,
    })
}

#[cfg(test)]
mod tests {
    use super::CandidateStatus::*;
    use super::*;

    const ALL_ROLES: [Role; 5] = [
        Role::Admin,
        Role::Counsellor,
        Role::Accounts,
        Role::Hr,
        Role::Instructor,
    ];

    #[test]
    fn every_listed_row_allows_its_roles_and_denies_the_rest() {
        for rule in TRANSITIONS {
            let froms: Vec<CandidateStatus> = match rule.from {
                FromStatus::Any => CandidateStatus::ALL.to_vec(),
                FromStatus::Only(s) => vec![s],
            };

            for from in froms {
                for role in ALL_ROLES {
                    let result = authorize_transition(from, rule.to, role);
                    let expected_allowed = match rule.roles {
                        AllowedRoles::AnyAuthenticated => true,
                        AllowedRoles::Listed(allowed) => allowed.contains(&role),
                    };

                    // A broader earlier row may own this (from, to) pair;
                    // only assert when this rule is the first match.
                    let first_match = TRANSITIONS
                        .iter()
                        .find(|r| r.from.matches(from) && r.to == rule.to)
                        .unwrap();
                    if !std::ptr::eq(first_match, rule) {
                        continue;
                    }

                    assert_eq!(
                        result.is_ok(),
                        expected_allowed,
                        "from={} to={} role={}",
                        from,
                        rule.to,
                        role
                    );
                }
            }
        }
    }

    #[test]
    fn admin_is_allowed_on_every_listed_transition() {
        for rule in TRANSITIONS {
            let from = match rule.from {
                FromStatus::Any => Demo,
                FromStatus::Only(s) => s,
            };
            assert!(
                authorize_transition(from, rule.to, Role::Admin).is_ok(),
                "ADMIN denied on {} -> {}",
                from,
                rule.to
            );
        }
    }

    #[test]
    fn unlisted_pairs_are_denied_for_every_role() {
        // (placement, demo) is not here: the (any) -> demo row covers it.
        let unlisted = [
            (Demo, Placement),
            (Demo, Class),
            (Demo, ClassQualified),
            (Placement, Class),
            (Placement, ClassQualified),
            (EnquiryStage, Placement),
            (Class, QualifiedDemo),
        ];

        for (from, to) in unlisted {
            for role in ALL_ROLES {
                assert_eq!(
                    authorize_transition(from, to, role),
                    Err(TransitionDenied::UnsupportedTransition { from, to }),
                    "expected denial for {} -> {} as {}",
                    from,
                    to,
                    role
                );
            }
        }
    }

    #[test]
    fn demo_is_reachable_from_any_status_by_admin_and_counsellor_only() {
        // The first table row has an open from side, so even a placed
        // candidate can be pulled back to demo by the roles listed there.
        for from in CandidateStatus::ALL {
            assert!(authorize_transition(from, Demo, Role::Admin).is_ok());
            assert!(authorize_transition(from, Demo, Role::Counsellor).is_ok());
            for role in [Role::Accounts, Role::Hr, Role::Instructor] {
                let err = authorize_transition(from, Demo, role).unwrap_err();
                assert!(
                    matches!(err, TransitionDenied::RoleNotAllowed { .. }),
                    "from={} role={}: {:?}",
                    from,
                    role,
                    err
                );
            }
        }
    }

    #[test]
    fn enquiry_stage_is_reachable_from_anywhere_by_any_role() {
        for from in CandidateStatus::ALL {
            for role in ALL_ROLES {
                assert!(authorize_transition(from, EnquiryStage, role).is_ok());
            }
        }
    }

    #[test]
    fn denial_is_deterministic() {
        // The table is stateless: repeating the same invalid request yields
        // the same outcome every time.
        for _ in 0..3 {
            assert_eq!(
                authorize_transition(Demo, Placement, Role::Admin),
                Err(TransitionDenied::UnsupportedTransition { from: Demo, to: Placement })
            );
        }
    }

    #[test]
    fn accounts_moves_qualified_demo_into_class() {
        assert!(authorize_transition(QualifiedDemo, Class, Role::Accounts).is_ok());
    }

    #[test]
    fn instructor_cannot_move_qualified_demo_into_class() {
        let err = authorize_transition(QualifiedDemo, Class, Role::Instructor).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Only "), "got: {}", message);
        assert!(message.contains("ADMIN"), "got: {}", message);
        assert!(message.contains("ACCOUNTS"), "got: {}", message);
        assert!(!message.contains("COUNSELLOR"), "got: {}", message);
    }

    #[test]
    fn counsellor_cannot_move_qualified_demo_into_class() {
        // Role segmentation is by business function: COUNSELLOR owns the
        // demo stages, ACCOUNTS owns enrollment.
        assert!(authorize_transition(QualifiedDemo, Class, Role::Counsellor).is_err());
        assert!(authorize_transition(QualifiedDemo, ClassQualified, Role::Counsellor).is_err());
    }

    #[test]
    fn accounts_cannot_place_a_candidate() {
        assert!(authorize_transition(ClassQualified, Placement, Role::Accounts).is_err());
        assert!(authorize_transition(Class, Placement, Role::Accounts).is_err());
        assert!(authorize_transition(ClassQualified, Placement, Role::Hr).is_ok());
        assert!(authorize_transition(Class, Placement, Role::Hr).is_ok());
    }

    #[test]
    fn admin_cannot_skip_demo_to_placement() {
        let err = authorize_transition(Demo, Placement, Role::Admin).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status transition from demo to placement"
        );
    }

    #[test]
    fn status_labels_round_trip() {
        use std::str::FromStr;
        for status in CandidateStatus::ALL {
            assert_eq!(CandidateStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(CandidateStatus::from_str("graduated").is_err());
    }
}
