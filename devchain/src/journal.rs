//! Ordered record of every request the development chain receives.

use alloy_primitives::Address;
use serde::Serialize;
use yieldvault_core::provider::ContractCall;
use yieldvault_core::{TxHash, TxKind};

/// One provider request, recorded before any fault is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Request {
    Accounts,
    RequestAccounts,
    ChainId,
    SwitchChain { chain_id: u64 },
    AddChain { chain_id: u64 },
    GetCode { address: Address },
    Call { to: Address, call: ContractCall },
    SendTransaction {
        from: Address,
        to: Address,
        call: ContractCall,
    },
    WaitForReceipt { hash: TxHash },
}

impl Request {
    /// The write kind, for transaction submissions.
    pub fn tx_kind(&self) -> Option<TxKind> {
        match self {
            Request::SendTransaction { call, .. } => call.tx_kind(),
            _ => None,
        }
    }

    /// Whether this request touched a contract, read or write.
    pub fn is_contract_request(&self) -> bool {
        matches!(
            self,
            Request::Call { .. } | Request::SendTransaction { .. } | Request::GetCode { .. }
        )
    }
}

/// Kinds of the submitted writes in `journal`, in order.
pub fn submitted_kinds(journal: &[Request]) -> Vec<TxKind> {
    journal.iter().filter_map(Request::tx_kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use yieldvault_core::provider::{TokenCall, VaultCall};

    #[test]
    fn submitted_kinds_skip_reads() {
        let vault = Address::repeat_byte(1);
        let journal = vec![
            Request::ChainId,
            Request::Call {
                to: vault,
                call: ContractCall::Vault(VaultCall::Decimals),
            },
            Request::SendTransaction {
                from: vault,
                to: vault,
                call: ContractCall::Token(TokenCall::Approve {
                    spender: vault,
                    amount: U256::from(1u8),
                }),
            },
        ];
        assert_eq!(submitted_kinds(&journal), vec![TxKind::Approve]);
        assert!(!journal[0].is_contract_request());
        assert!(journal[1].is_contract_request());
    }
}
