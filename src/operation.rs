use crate::error::DispatchError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The fixed menu of operations a run can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CreateWallet,
    GetAccountInfo,
    GetBalance,
    GetMultipleTokenBalances,
    GetTokenBalance,
    GetTxDetails,
    SendSol,
    SendToken,
    SignMessage,
    StakeSol,
    VerifySignature,
    WithdrawStake,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::CreateWallet,
        Operation::GetAccountInfo,
        Operation::GetBalance,
        Operation::GetMultipleTokenBalances,
        Operation::GetTokenBalance,
        Operation::GetTxDetails,
        Operation::SendSol,
        Operation::SendToken,
        Operation::SignMessage,
        Operation::StakeSol,
        Operation::VerifySignature,
        Operation::WithdrawStake,
    ];

    /// Value used in configuration and in output records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateWallet => "createWallet",
            Operation::GetAccountInfo => "getAccountInfo",
            Operation::GetBalance => "getBalance",
            Operation::GetMultipleTokenBalances => "getMultipleTokenBalances",
            Operation::GetTokenBalance => "getTokenBalance",
            Operation::GetTxDetails => "getTxDetails",
            Operation::SendSol => "sendSol",
            Operation::SendToken => "sendToken",
            Operation::SignMessage => "signMessage",
            Operation::StakeSol => "stakeSol",
            Operation::VerifySignature => "verifySignature",
            Operation::WithdrawStake => "withdrawStake",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::CreateWallet => "Create Wallet",
            Operation::GetAccountInfo => "Get Account Info",
            Operation::GetBalance => "Get Balance",
            Operation::GetMultipleTokenBalances => "Get Multiple Token Balances",
            Operation::GetTokenBalance => "Get Token Balance",
            Operation::GetTxDetails => "Get Transaction Details",
            Operation::SendSol => "Send SOL",
            Operation::SendToken => "Send Token",
            Operation::SignMessage => "Sign Message",
            Operation::StakeSol => "Stake SOL",
            Operation::VerifySignature => "Verify Signature",
            Operation::WithdrawStake => "Withdraw Stake",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::CreateWallet => "Generate a new Solana wallet (keypair)",
            Operation::GetAccountInfo => "Retrieve detailed info about a Solana account",
            Operation::GetBalance => "Get the SOL balance of an address",
            Operation::GetMultipleTokenBalances => {
                "Retrieve balances for multiple tokens for a given address"
            }
            Operation::GetTokenBalance => "Get the SPL token balance of an address",
            Operation::GetTxDetails => "Fetch and parse transaction details by signature",
            Operation::SendSol => "Send SOL to an address",
            Operation::SendToken => "Send an SPL token to an address",
            Operation::SignMessage => "Sign a message with your private key",
            Operation::StakeSol => "Create a stake account and delegate SOL to a validator",
            Operation::VerifySignature => "Verify a signature against a message and public key",
            Operation::WithdrawStake => "Withdraw staked SOL from a stake account",
        }
    }

    /// Whether the operation submits a transaction signed by the run's wallet.
    pub fn submits_transaction(&self) -> bool {
        matches!(
            self,
            Operation::SendSol
                | Operation::SendToken
                | Operation::StakeSol
                | Operation::WithdrawStake
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| DispatchError::UnsupportedOperation(s.to_string()))
    }
}
