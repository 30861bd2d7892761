use crate::operation::Operation;
use indexmap::IndexMap;
use serde::{Serialize, ser::Error as _};
use serde_json::{Map, Value, json};
use solana_sdk::account::Account;

/// Operation-specific fields of a successful item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    #[serde(rename_all = "camelCase")]
    Wallet {
        public_key: String,
        private_key: String,
    },
    Balance {
        balance: Option<f64>,
    },
    /// Keyed by mint, in the order the mints were requested.
    TokenBalances {
        balances: IndexMap<String, Option<f64>>,
    },
    #[serde(rename_all = "camelCase")]
    AccountInfo {
        account_info: Value,
    },
    #[serde(rename_all = "camelCase")]
    TxDetails {
        tx_details: Value,
    },
    #[serde(rename_all = "camelCase")]
    Submitted {
        tx_signature: String,
    },
    #[serde(rename_all = "camelCase")]
    Staked {
        stake_account: String,
        tx_signature: String,
    },
    Signed {
        signature: String,
    },
    #[serde(rename_all = "camelCase")]
    Verified {
        is_valid: bool,
    },
}

impl OperationOutput {
    pub fn account_info(account: &Account) -> Self {
        OperationOutput::AccountInfo {
            account_info: json!({
                "lamports": account.lamports,
                "owner": account.owner.to_string(),
                "data": account.data,
                "executable": account.executable,
                "rentEpoch": account.rent_epoch,
                "space": account.data.len(),
            }),
        }
    }
}

/// Outcome of one item, immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Success {
        operation: Operation,
        output: OperationOutput,
    },
    Failure {
        error: String,
    },
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    /// `{success: true, operation, ...fields}` or `{error}`.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            OperationResult::Success { operation, output } => {
                let fields = match serde_json::to_value(output)? {
                    Value::Object(fields) => fields,
                    other => {
                        return Err(serde_json::Error::custom(format!(
                            "output of {operation} is not an object: {other}"
                        )));
                    }
                };

                let mut object = Map::new();
                object.insert("success".to_string(), Value::Bool(true));
                object.extend(fields);
                object.insert("operation".to_string(), json!(operation));
                Ok(Value::Object(object))
            }
            OperationResult::Failure { error } => Ok(json!({ "error": error })),
        }
    }
}

/// One emitted record, paired with the input item it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub item_index: usize,
    pub result: OperationResult,
}

impl Serialize for OutputRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = self.result.to_json().map_err(S::Error::custom)?;
        json!({
            "json": json,
            "pairedItem": self.item_index,
        })
        .serialize(serializer)
    }
}
