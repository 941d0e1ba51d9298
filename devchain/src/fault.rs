//! Fault injection for exercising the dashboard's failure paths.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use yieldvault_core::TxKind;

/// A failure the development chain will produce on demand.
///
/// Every fault fires once and is then consumed, except
/// [`Fault::FailReads`], which stays until [`crate::DevChain::clear_faults`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fault", content = "target", rename_all = "snake_case")]
pub enum Fault {
    /// The user dismisses the signing prompt for the next write of this kind.
    RejectWrite(TxKind),
    /// The next write of this kind is mined but reverts.
    RevertWrite(TxKind),
    /// Every read-only call against this address fails at the RPC layer.
    FailReads(Address),
    /// The user dismisses the next connection prompt.
    RejectAccounts,
    /// The user dismisses the next network switch prompt.
    RejectSwitch,
    /// The user dismisses the next add-network prompt.
    RejectAdd,
}

impl Fault {
    pub fn is_sticky(&self) -> bool {
        matches!(self, Fault::FailReads(_))
    }
}

/// Pending faults, in injection order.
#[derive(Debug, Clone, Default)]
pub(crate) struct FaultSet {
    faults: Vec<Fault>,
}

impl FaultSet {
    pub(crate) fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub(crate) fn clear(&mut self) {
        self.faults.clear();
    }

    pub(crate) fn pending(&self) -> &[Fault] {
        &self.faults
    }

    /// Fires the first fault equal to `fault`, consuming it unless sticky.
    pub(crate) fn take(&mut self, fault: &Fault) -> bool {
        let Some(pos) = self.faults.iter().position(|f| f == fault) else {
            return false;
        };
        if !fault.is_sticky() {
            self.faults.remove(pos);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_faults_are_consumed() {
        let mut set = FaultSet::default();
        set.inject(Fault::RejectWrite(TxKind::Approve));

        assert!(!set.take(&Fault::RejectWrite(TxKind::Deposit)));
        assert!(set.take(&Fault::RejectWrite(TxKind::Approve)));
        assert!(!set.take(&Fault::RejectWrite(TxKind::Approve)));
    }

    #[test]
    fn read_faults_stick_until_cleared() {
        let mut set = FaultSet::default();
        let target = Address::repeat_byte(9);
        set.inject(Fault::FailReads(target));

        assert!(set.take(&Fault::FailReads(target)));
        assert!(set.take(&Fault::FailReads(target)));
        set.clear();
        assert!(!set.take(&Fault::FailReads(target)));
        assert!(set.pending().is_empty());
    }
}
