//! Per-item parameter resolution.
//!
//! Each input item is a JSON object of camelCase parameters. Resolution turns
//! it into an [`OperationRequest`] holding only the fields the selected
//! operation needs, with addresses already parsed.

use crate::error::DispatchError;
use crate::operation::Operation;
use serde::Deserialize;
use serde_json::Value;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::str::FromStr;

/// Raw parameters of one input item. Absent keys take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemParameters {
    pub address: String,
    pub amount: f64,
    pub token_mint: String,
    pub token_mints: String,
    pub include_donation: bool,
    pub message: String,
    pub signature: String,
    pub pub_key: String,
    pub tx_signature: String,
    pub account_address: String,
    pub validator: String,
    pub stake_account: String,
    pub destination: String,
}

impl Default for ItemParameters {
    fn default() -> Self {
        Self {
            address: String::new(),
            amount: 0.0,
            token_mint: String::new(),
            token_mints: String::new(),
            include_donation: true,
            message: String::new(),
            signature: String::new(),
            pub_key: String::new(),
            tx_signature: String::new(),
            account_address: String::new(),
            validator: String::new(),
            stake_account: String::new(),
            destination: String::new(),
        }
    }
}

impl ItemParameters {
    pub fn from_item(item: &Value) -> Result<Self, DispatchError> {
        if item.is_null() {
            return Ok(Self::default());
        }
        if !item.is_object() {
            return Err(DispatchError::InvalidParameters(format!(
                "expected an object, got {item}"
            )));
        }
        Self::deserialize(item).map_err(|e| DispatchError::InvalidParameters(e.to_string()))
    }
}

/// A fully resolved request for one item.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    CreateWallet,
    GetAccountInfo {
        account: Pubkey,
    },
    GetBalance {
        /// `None` means the run's own wallet.
        address: Option<Pubkey>,
    },
    GetMultipleTokenBalances {
        owner: Pubkey,
        /// Raw mint strings; each is parsed during its own lookup.
        mints: Vec<String>,
    },
    GetTokenBalance {
        owner: Pubkey,
        mint: Pubkey,
    },
    GetTxDetails {
        signature: Signature,
    },
    SendSol {
        recipient: Pubkey,
        amount: f64,
        include_donation: bool,
    },
    SendToken {
        recipient: Pubkey,
        mint: Pubkey,
        amount: f64,
    },
    SignMessage {
        message: String,
    },
    StakeSol {
        validator: Pubkey,
        amount: f64,
    },
    VerifySignature {
        message: String,
        signature: String,
        public_key: String,
    },
    WithdrawStake {
        stake_account: Pubkey,
        destination: Pubkey,
        amount: f64,
    },
}

impl OperationRequest {
    pub fn resolve(operation: Operation, params: &ItemParameters) -> Result<Self, DispatchError> {
        let request = match operation {
            Operation::CreateWallet => OperationRequest::CreateWallet,
            Operation::GetAccountInfo => OperationRequest::GetAccountInfo {
                account: parse_pubkey(
                    "account address",
                    required("Account address", &params.account_address)?,
                )?,
            },
            Operation::GetBalance => {
                let address = params.address.trim();
                OperationRequest::GetBalance {
                    address: if address.is_empty() {
                        None
                    } else {
                        Some(parse_pubkey("address", address)?)
                    },
                }
            }
            Operation::GetMultipleTokenBalances => OperationRequest::GetMultipleTokenBalances {
                owner: parse_pubkey("address", required("Address", &params.address)?)?,
                mints: split_mints(&params.token_mints),
            },
            Operation::GetTokenBalance => OperationRequest::GetTokenBalance {
                owner: parse_pubkey("address", required("Address", &params.address)?)?,
                mint: parse_pubkey("token mint", required("Token mint", &params.token_mint)?)?,
            },
            Operation::GetTxDetails => {
                let raw = required("Transaction signature", &params.tx_signature)?;
                OperationRequest::GetTxDetails {
                    signature: Signature::from_str(raw)
                        .map_err(|e| DispatchError::InvalidSignature(e.to_string()))?,
                }
            }
            Operation::SendSol => OperationRequest::SendSol {
                recipient: parse_pubkey("recipient", required("Recipient", &params.address)?)?,
                amount: checked_amount(params.amount)?,
                include_donation: params.include_donation,
            },
            Operation::SendToken => OperationRequest::SendToken {
                recipient: parse_pubkey("recipient", required("Recipient", &params.address)?)?,
                mint: parse_pubkey("token mint", required("Token mint", &params.token_mint)?)?,
                amount: checked_amount(params.amount)?,
            },
            Operation::SignMessage => {
                if params.message.is_empty() {
                    return Err(DispatchError::MissingParameter("Message"));
                }
                OperationRequest::SignMessage {
                    message: params.message.clone(),
                }
            }
            Operation::StakeSol => OperationRequest::StakeSol {
                validator: parse_pubkey(
                    "validator",
                    required("Validator vote account", &params.validator)?,
                )?,
                amount: checked_amount(params.amount)?,
            },
            Operation::VerifySignature => {
                if params.message.is_empty()
                    || params.signature.trim().is_empty()
                    || params.pub_key.trim().is_empty()
                {
                    return Err(DispatchError::MissingParameter(
                        "Message, signature and public key",
                    ));
                }
                OperationRequest::VerifySignature {
                    message: params.message.clone(),
                    signature: params.signature.trim().to_string(),
                    public_key: params.pub_key.trim().to_string(),
                }
            }
            Operation::WithdrawStake => OperationRequest::WithdrawStake {
                stake_account: parse_pubkey(
                    "stake account",
                    required("Stake account", &params.stake_account)?,
                )?,
                destination: parse_pubkey(
                    "destination",
                    required("Destination", &params.destination)?,
                )?,
                amount: checked_amount(params.amount)?,
            },
        };
        Ok(request)
    }

    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::CreateWallet => Operation::CreateWallet,
            OperationRequest::GetAccountInfo { .. } => Operation::GetAccountInfo,
            OperationRequest::GetBalance { .. } => Operation::GetBalance,
            OperationRequest::GetMultipleTokenBalances { .. } => {
                Operation::GetMultipleTokenBalances
            }
            OperationRequest::GetTokenBalance { .. } => Operation::GetTokenBalance,
            OperationRequest::GetTxDetails { .. } => Operation::GetTxDetails,
            OperationRequest::SendSol { .. } => Operation::SendSol,
            OperationRequest::SendToken { .. } => Operation::SendToken,
            OperationRequest::SignMessage { .. } => Operation::SignMessage,
            OperationRequest::StakeSol { .. } => Operation::StakeSol,
            OperationRequest::VerifySignature { .. } => Operation::VerifySignature,
            OperationRequest::WithdrawStake { .. } => Operation::WithdrawStake,
        }
    }
}

pub fn parse_pubkey(field: &'static str, value: &str) -> Result<Pubkey, DispatchError> {
    Pubkey::from_str(value.trim()).map_err(|e| DispatchError::invalid_address(field, e))
}

/// Split a comma-separated mint list, trimming entries and dropping empty ones.
pub fn split_mints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|mint| !mint.is_empty())
        .map(String::from)
        .collect()
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, DispatchError> {
    let value = value.trim();
    if value.is_empty() {
        Err(DispatchError::MissingParameter(name))
    } else {
        Ok(value)
    }
}

fn checked_amount(amount: f64) -> Result<f64, DispatchError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(DispatchError::InvalidAmount(amount))
    }
}
