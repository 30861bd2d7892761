//! The per-item operation loop.
//!
//! A run decodes the wallet once, shares one [`ChainClient`] across every
//! item, and processes items strictly in order. Each item yields exactly one
//! [`OutputRecord`] unless the run is fail-fast, in which case the first
//! failing item aborts the run.

use crate::client::ChainClient;
use crate::config::Credentials;
use crate::error::{DispatchError, ExecutionError};
use crate::keys;
use crate::operation::Operation;
use crate::output::{OperationOutput, OperationResult, OutputRecord};
use crate::request::{ItemParameters, OperationRequest, parse_pubkey};
use crate::transaction::{
    DEFAULT_TOKEN_DECIMALS, STAKE_ACCOUNT_SPACE, lamports_to_sol, scale_token_amount,
    send_sol_instructions, sign_legacy, sign_versioned, sol_to_lamports, stake_instructions,
    token_transfer_instructions, withdraw_stake_instruction,
};
use indexmap::IndexMap;
use serde_json::Value;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tracing::{debug, info, warn};

/// Read-only state shared by every item of a run.
pub struct RunContext<C> {
    pub client: C,
    pub sender: Keypair,
    pub donation_address: Pubkey,
}

impl<C: ChainClient> RunContext<C> {
    /// Decode the configured credentials. Any failure here is a configuration
    /// error and no item is processed.
    pub fn new(client: C, credentials: &Credentials) -> Result<Self, DispatchError> {
        let sender = keys::decode_keypair(&credentials.private_key)?;
        let donation_address = parse_pubkey("donation address", &credentials.donation_address)
            .map_err(|e| DispatchError::Configuration(e.to_string()))?;

        info!("Loaded wallet {}", sender.pubkey());
        Ok(Self {
            client,
            sender,
            donation_address,
        })
    }
}

pub struct Dispatcher<C> {
    context: RunContext<C>,
    continue_on_fail: bool,
}

impl<C: ChainClient> Dispatcher<C> {
    pub fn new(context: RunContext<C>, continue_on_fail: bool) -> Self {
        Self {
            context,
            continue_on_fail,
        }
    }

    pub fn context(&self) -> &RunContext<C> {
        &self.context
    }

    /// Process `items` in order with the configured `operation` value.
    pub async fn execute(
        &self,
        operation: &str,
        items: &[Value],
    ) -> Result<Vec<OutputRecord>, ExecutionError> {
        info!("Processing {} items with operation {}", items.len(), operation);

        let mut records = Vec::with_capacity(items.len());
        for (item_index, item) in items.iter().enumerate() {
            match process_item(&self.context, operation, item).await {
                Ok(result) => records.push(OutputRecord { item_index, result }),
                Err(source) if self.continue_on_fail => {
                    warn!("Item {} failed: {}", item_index, source);
                    records.push(OutputRecord {
                        item_index,
                        result: OperationResult::Failure {
                            error: source.to_string(),
                        },
                    });
                }
                Err(source) => return Err(ExecutionError { item_index, source }),
            }
        }

        let failed = records.iter().filter(|r| !r.result.is_success()).count();
        info!(
            "Completed {} items ({} succeeded, {} failed)",
            records.len(),
            records.len() - failed,
            failed
        );
        Ok(records)
    }
}

/// Resolve one item's parameters and perform the operation.
pub async fn process_item<C: ChainClient>(
    context: &RunContext<C>,
    operation: &str,
    item: &Value,
) -> Result<OperationResult, DispatchError> {
    let operation: Operation = operation.parse()?;
    let params = ItemParameters::from_item(item)?;
    let request = OperationRequest::resolve(operation, &params)?;
    if operation.submits_transaction() {
        info!("Submitting {} from {}", operation, context.sender.pubkey());
    }

    let output = perform(context, request).await?;
    Ok(OperationResult::Success { operation, output })
}

pub async fn perform<C: ChainClient>(
    context: &RunContext<C>,
    request: OperationRequest,
) -> Result<OperationOutput, DispatchError> {
    let client = &context.client;
    let sender = &context.sender;
    debug!("Performing {}", request.operation());

    match request {
        OperationRequest::CreateWallet => {
            let wallet = keys::generate_wallet();
            info!("Generated wallet {}", wallet.public_key);
            Ok(OperationOutput::Wallet {
                public_key: wallet.public_key,
                private_key: wallet.private_key,
            })
        }

        OperationRequest::GetBalance { address } => {
            let address = address.unwrap_or_else(|| sender.pubkey());
            let lamports = client.get_balance(&address).await?;
            debug!("Balance of {}: {} lamports", address, lamports);
            Ok(OperationOutput::Balance {
                balance: Some(lamports_to_sol(lamports)),
            })
        }

        OperationRequest::GetTokenBalance { owner, mint } => {
            let token_account = client.derive_associated_token_address(&mint, &owner);
            let balance = client.get_token_account_balance(&token_account).await?;
            Ok(OperationOutput::Balance { balance })
        }

        OperationRequest::GetMultipleTokenBalances { owner, mints } => {
            let mut balances = IndexMap::new();
            for mint in mints {
                let balance = match token_balance(client, &owner, &mint).await {
                    Ok(balance) => balance,
                    Err(e) => {
                        warn!("Balance lookup for mint {} failed: {}", mint, e);
                        None
                    }
                };
                balances.insert(mint, balance);
            }
            Ok(OperationOutput::TokenBalances { balances })
        }

        OperationRequest::GetAccountInfo { account } => {
            match client.get_account_info(&account).await? {
                Some(info) => Ok(OperationOutput::account_info(&info)),
                None => Err(DispatchError::NotFound(format!(
                    "No account info found for address: {account}"
                ))),
            }
        }

        OperationRequest::GetTxDetails { signature } => {
            match client.get_transaction(&signature).await? {
                Some(tx_details) => Ok(OperationOutput::TxDetails { tx_details }),
                None => Err(DispatchError::NotFound(format!(
                    "No transaction details found for signature: {signature}"
                ))),
            }
        }

        OperationRequest::SendSol {
            recipient,
            amount,
            include_donation,
        } => {
            let lamports = sol_to_lamports(amount)?;
            let recent_blockhash = client.get_latest_blockhash().await?;
            let donation_address = include_donation.then_some(&context.donation_address);
            let instructions =
                send_sol_instructions(&sender.pubkey(), &recipient, lamports, donation_address);
            let tx = sign_legacy(&instructions, sender, &[], recent_blockhash)?;

            let signature = client.send_transaction(&tx).await?;
            info!(
                "Sent {} lamports to {} (donation: {}): {}",
                lamports, recipient, include_donation, signature
            );
            Ok(OperationOutput::Submitted {
                tx_signature: signature.to_string(),
            })
        }

        OperationRequest::SendToken {
            recipient,
            mint,
            amount,
        } => {
            let decimals = mint_decimals(client, &mint).await?;
            let raw_amount = scale_token_amount(amount, decimals)?;

            let recipient_account = client.derive_associated_token_address(&mint, &recipient);
            let create_recipient_account =
                client.get_account_info(&recipient_account).await?.is_none();
            if create_recipient_account {
                debug!("Recipient token account {} does not exist", recipient_account);
            }

            let instructions = token_transfer_instructions(
                &sender.pubkey(),
                &recipient,
                &mint,
                raw_amount,
                create_recipient_account,
            )?;
            let recent_blockhash = client.get_latest_blockhash().await?;
            let tx = sign_versioned(&instructions, sender, recent_blockhash)?;

            let signature = client.send_versioned_transaction(&tx).await?;
            info!(
                "Sent {} base units of {} to {}: {}",
                raw_amount, mint, recipient, signature
            );
            Ok(OperationOutput::Submitted {
                tx_signature: signature.to_string(),
            })
        }

        OperationRequest::SignMessage { message } => Ok(OperationOutput::Signed {
            signature: keys::sign_message(sender, &message),
        }),

        OperationRequest::VerifySignature {
            message,
            signature,
            public_key,
        } => Ok(OperationOutput::Verified {
            is_valid: keys::verify_signature(&message, &signature, &public_key)?,
        }),

        OperationRequest::StakeSol { validator, amount } => {
            let lamports = sol_to_lamports(amount)?;
            let stake_account = Keypair::new();
            let rent_exempt = client
                .get_minimum_balance_for_rent_exemption(STAKE_ACCOUNT_SPACE as usize)
                .await?;
            let funding = lamports
                .checked_add(rent_exempt)
                .ok_or(DispatchError::InvalidAmount(amount))?;

            let recent_blockhash = client.get_latest_blockhash().await?;
            let instructions = stake_instructions(
                &sender.pubkey(),
                &stake_account.pubkey(),
                &validator,
                funding,
            );
            let tx = sign_legacy(&instructions, sender, &[&stake_account], recent_blockhash)?;

            let signature = client.send_transaction(&tx).await?;
            info!(
                "Delegated {} lamports to {} via stake account {}: {}",
                lamports,
                validator,
                stake_account.pubkey(),
                signature
            );
            Ok(OperationOutput::Staked {
                stake_account: stake_account.pubkey().to_string(),
                tx_signature: signature.to_string(),
            })
        }

        OperationRequest::WithdrawStake {
            stake_account,
            destination,
            amount,
        } => {
            let lamports = sol_to_lamports(amount)?;
            let recent_blockhash = client.get_latest_blockhash().await?;
            let instruction =
                withdraw_stake_instruction(&stake_account, &sender.pubkey(), &destination, lamports);
            let tx = sign_legacy(&[instruction], sender, &[], recent_blockhash)?;

            let signature = client.send_transaction(&tx).await?;
            info!(
                "Withdrew {} lamports from {} to {}: {}",
                lamports, stake_account, destination, signature
            );
            Ok(OperationOutput::Submitted {
                tx_signature: signature.to_string(),
            })
        }
    }
}

async fn token_balance<C: ChainClient>(
    client: &C,
    owner: &Pubkey,
    mint: &str,
) -> Result<Option<f64>, DispatchError> {
    let mint = parse_pubkey("token mint", mint)?;
    let token_account = client.derive_associated_token_address(&mint, owner);
    Ok(client.get_token_account_balance(&token_account).await?)
}

/// Decimal precision of `mint`, falling back to the default when the parsed
/// account does not expose it.
async fn mint_decimals<C: ChainClient>(client: &C, mint: &Pubkey) -> Result<u8, DispatchError> {
    let parsed = client.get_parsed_account_info(mint).await?;
    let decimals = parsed
        .as_ref()
        .and_then(|account| account.pointer("/data/parsed/info/decimals"))
        .and_then(Value::as_u64)
        .and_then(|decimals| u8::try_from(decimals).ok());

    match decimals {
        Some(decimals) => Ok(decimals),
        None => {
            debug!(
                "Mint {} has no readable decimals, assuming {}",
                mint, DEFAULT_TOKEN_DECIMALS
            );
            Ok(DEFAULT_TOKEN_DECIMALS)
        }
    }
}
