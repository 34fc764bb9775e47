//! Observer assignments nested inside resource sharing agreements.

use serde::{Deserialize, Serialize};

use crate::identity::Party;

/// A third party granted access to an agreement's resources.
///
/// Identity observers start unaccepted and must accept for themselves.
/// Contact observers have no way to confirm on the ledger, so they are
/// accepted on assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverAssignment {
    pub observer: Party,
    pub accepted: bool,
}

impl ObserverAssignment {
    pub fn new(observer: Party) -> Self {
        let accepted = observer.is_contact();
        Self { observer, accepted }
    }

    /// Whether this assignment currently grants access to `accessor`.
    pub fn grants_access_to(&self, accessor: &Party) -> bool {
        self.accepted && &self.observer == accessor
    }
}
