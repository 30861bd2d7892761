//! In-memory [`ChainClient`] used by the unit tests.

use crate::client::ChainClient;
use async_trait::async_trait;
use serde_json::Value;
use solana_client::client_error::{ClientError, ClientErrorKind, Result as ClientResult};
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, VersionedTransaction},
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    balances: HashMap<Pubkey, u64>,
    token_balances: HashMap<Pubkey, Option<f64>>,
    accounts: HashMap<Pubkey, Account>,
    parsed_accounts: HashMap<Pubkey, Value>,
    transactions: HashMap<Signature, Value>,
    rent_exemption: u64,
    rent_requests: Vec<usize>,
    rejection: Option<String>,
    sent: Vec<Transaction>,
    sent_versioned: Vec<VersionedTransaction>,
}

#[derive(Default)]
pub struct MockChainClient {
    state: Mutex<State>,
}

fn custom(message: impl Into<String>) -> ClientError {
    ClientError::from(ClientErrorKind::Custom(message.into()))
}

impl MockChainClient {
    pub fn set_balance(&self, address: Pubkey, lamports: u64) {
        self.state.lock().unwrap().balances.insert(address, lamports);
    }

    pub fn set_token_balance(&self, token_account: Pubkey, ui_amount: Option<f64>) {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .insert(token_account, ui_amount);
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    pub fn set_parsed_account(&self, address: Pubkey, parsed: Value) {
        self.state
            .lock()
            .unwrap()
            .parsed_accounts
            .insert(address, parsed);
    }

    pub fn set_transaction(&self, signature: Signature, details: Value) {
        self.state
            .lock()
            .unwrap()
            .transactions
            .insert(signature, details);
    }

    pub fn set_rent_exemption(&self, lamports: u64) {
        self.state.lock().unwrap().rent_exemption = lamports;
    }

    pub fn reject_submissions(&self, reason: &str) {
        self.state.lock().unwrap().rejection = Some(reason.to_string());
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_versioned_transactions(&self) -> Vec<VersionedTransaction> {
        self.state.lock().unwrap().sent_versioned.clone()
    }

    pub fn rent_requests(&self) -> Vec<usize> {
        self.state.lock().unwrap().rent_requests.clone()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .balances
            .get(address)
            .copied()
            .unwrap_or_default())
    }

    async fn get_token_account_balance(&self, token_account: &Pubkey) -> ClientResult<Option<f64>> {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .get(token_account)
            .copied()
            .ok_or_else(|| custom(format!("could not find account {token_account}")))
    }

    async fn get_account_info(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }

    async fn get_parsed_account_info(&self, address: &Pubkey) -> ClientResult<Option<Value>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .parsed_accounts
            .get(address)
            .cloned())
    }

    async fn get_transaction(&self, signature: &Signature) -> ClientResult<Option<Value>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .transactions
            .get(signature)
            .cloned())
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.rent_requests.push(data_len);
        Ok(state.rent_exemption)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.rejection {
            return Err(custom(reason.clone()));
        }
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn send_versioned_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> ClientResult<Signature> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.rejection {
            return Err(custom(reason.clone()));
        }
        state.sent_versioned.push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}
