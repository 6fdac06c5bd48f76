use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A value transfer waiting in the pending pool or sealed inside a block.
/// Fields are declared in lexicographic order; block hashing relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub receiver: String,
    pub sender: String,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            amount,
            receiver: receiver.into(),
            sender: sender.into(),
        }
    }
}

/// Submitted transaction as it arrives from a caller. Every field is optional
/// so that missing ones can be reported together instead of failing on the first.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<f64>,
}

impl TryFrom<TransactionRequest> for Transaction {
    type Error = LedgerError;

    fn try_from(req: TransactionRequest) -> Result<Self, Self::Error> {
        let sender = req.sender.filter(|s| !s.trim().is_empty());
        let receiver = req.receiver.filter(|s| !s.trim().is_empty());

        let mut missing = Vec::new();
        if sender.is_none() {
            missing.push("sender");
        }
        if receiver.is_none() {
            missing.push("receiver");
        }
        if req.amount.is_none() {
            missing.push("amount");
        }

        match (sender, receiver, req.amount) {
            (Some(sender), Some(receiver), Some(amount)) => Ok(Self {
                amount,
                receiver,
                sender,
            }),
            _ => Err(LedgerError::MalformedTransaction { missing }),
        }
    }
}
