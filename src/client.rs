use async_trait::async_trait;
use serde_json::{Value, json};
use solana_client::{
    client_error::Result as ClientResult, nonblocking::rpc_client::RpcClient,
    rpc_config::RpcTransactionConfig, rpc_request::RpcRequest, rpc_response::Response,
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, VersionedTransaction},
};
use solana_transaction_status::UiTransactionEncoding;
use tracing::debug;

/// The narrow slice of a Solana node the dispatcher talks to.
///
/// Lookups that can legitimately find nothing return `Ok(None)`; transport
/// and node-side failures surface as `ClientError`.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_latest_blockhash(&self) -> ClientResult<Hash>;

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64>;

    /// UI-scaled balance of a token account.
    async fn get_token_account_balance(&self, token_account: &Pubkey) -> ClientResult<Option<f64>>;

    async fn get_account_info(&self, address: &Pubkey) -> ClientResult<Option<Account>>;

    /// The account as returned with `jsonParsed` encoding.
    async fn get_parsed_account_info(&self, address: &Pubkey) -> ClientResult<Option<Value>>;

    async fn get_transaction(&self, signature: &Signature) -> ClientResult<Option<Value>>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64>;

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature>;

    async fn send_versioned_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> ClientResult<Signature>;

    fn derive_associated_token_address(&self, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(owner, mint)
    }
}

/// [`ChainClient`] backed by a JSON-RPC endpoint.
pub struct RpcChainClient {
    rpc_client: RpcClient,
}

impl RpcChainClient {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc_client: RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
        }
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        self.rpc_client.get_latest_blockhash().await
    }

    async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64> {
        self.rpc_client.get_balance(address).await
    }

    async fn get_token_account_balance(&self, token_account: &Pubkey) -> ClientResult<Option<f64>> {
        let balance = self
            .rpc_client
            .get_token_account_balance(token_account)
            .await?;
        Ok(balance.ui_amount)
    }

    async fn get_account_info(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await?;
        Ok(response.value)
    }

    async fn get_parsed_account_info(&self, address: &Pubkey) -> ClientResult<Option<Value>> {
        let response: Response<Option<Value>> = self
            .rpc_client
            .send(
                RpcRequest::GetAccountInfo,
                json!([
                    address.to_string(),
                    {
                        "encoding": "jsonParsed",
                        "commitment": self.rpc_client.commitment().commitment,
                    }
                ]),
            )
            .await?;
        Ok(response.value)
    }

    async fn get_transaction(&self, signature: &Signature) -> ClientResult<Option<Value>> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(self.rpc_client.commitment()),
            max_supported_transaction_version: Some(0),
        };
        self.rpc_client
            .send(
                RpcRequest::GetTransaction,
                json!([signature.to_string(), config]),
            )
            .await
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        self.rpc_client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        debug!(
            "Submitting legacy transaction with {} instructions",
            transaction.message.instructions.len()
        );
        self.rpc_client.send_transaction(transaction).await
    }

    async fn send_versioned_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> ClientResult<Signature> {
        debug!(
            "Submitting versioned transaction with {} instructions",
            transaction.message.instructions().len()
        );
        self.rpc_client.send_transaction(transaction).await
    }
}
