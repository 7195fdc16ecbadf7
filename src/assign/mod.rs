pub mod associative;
pub mod direct;
pub mod set_assoc;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    cache::{Address, Page},
    error::SimError,
};

use self::{associative::Associative, direct::Direct, set_assoc::SetAssociative};

/// Which assignment policy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    Direct,
    Associative,
    #[serde(alias = "set-associative", alias = "two_way")]
    SetAssociative,
}

impl MappingKind {
    pub const ALL: [MappingKind; 3] = [
        MappingKind::Direct,
        MappingKind::Associative,
        MappingKind::SetAssociative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MappingKind::Direct => "direct",
            MappingKind::Associative => "associative",
            MappingKind::SetAssociative => "set associative",
        }
    }

    /// Direct mapping overwrites in place and never needs a victim.
    pub fn needs_replacement(self) -> bool {
        !matches!(self, MappingKind::Direct)
    }

    pub fn is_tabular(self) -> bool {
        matches!(self, MappingKind::SetAssociative)
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Places pages that are not yet resident.
#[derive(Debug, Clone)]
pub enum AssignmentPolicy {
    Direct(Direct),
    Associative(Associative),
    SetAssociative(SetAssociative),
}

impl AssignmentPolicy {
    pub fn new(kind: MappingKind, capacity: usize) -> Self {
        match kind {
            MappingKind::Direct => AssignmentPolicy::Direct(Direct::new(capacity)),
            MappingKind::Associative => AssignmentPolicy::Associative(Associative::new(capacity)),
            MappingKind::SetAssociative => {
                AssignmentPolicy::SetAssociative(SetAssociative::new(capacity))
            }
        }
    }

    pub fn kind(&self) -> MappingKind {
        match self {
            AssignmentPolicy::Direct(_) => MappingKind::Direct,
            AssignmentPolicy::Associative(_) => MappingKind::Associative,
            AssignmentPolicy::SetAssociative(_) => MappingKind::SetAssociative,
        }
    }

    pub fn assign(&mut self, page: Page) -> Address {
        match self {
            AssignmentPolicy::Direct(direct) => direct.assign(page),
            AssignmentPolicy::Associative(assoc) => assoc.assign(page),
            AssignmentPolicy::SetAssociative(sa) => sa.assign(page),
        }
    }

    /// Direct mapping has no tabular form and set associative mapping is
    /// always tabular, so both refuse the switch.
    pub fn set_tabular(&mut self, tabular: bool) -> Result<(), SimError> {
        let policy = self.kind().name();
        match self {
            AssignmentPolicy::Associative(assoc) => {
                assoc.set_tabular(tabular);
                Ok(())
            }
            AssignmentPolicy::Direct(_) | AssignmentPolicy::SetAssociative(_) => {
                Err(SimError::TabularForbidden { policy })
            }
        }
    }
}
