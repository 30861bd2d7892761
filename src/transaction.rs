use crate::error::DispatchError;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::{VersionedMessage, v0},
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    stake::{
        self,
        state::{Authorized, Lockup},
    },
    system_instruction,
    transaction::{Transaction, VersionedTransaction},
};

/// Space allocated for a new stake account (`StakeStateV2::size_of()`).
pub const STAKE_ACCOUNT_SPACE: u64 = 200;

/// Token decimals assumed when the mint's precision cannot be read.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 9;

/// Convert whole SOL to lamports, rejecting amounts that do not fit in a `u64`.
pub fn sol_to_lamports(amount: f64) -> Result<u64, DispatchError> {
    let lamports = (amount * LAMPORTS_PER_SOL as f64).round();
    if !lamports.is_finite() || lamports < 0.0 || lamports >= u64::MAX as f64 {
        return Err(DispatchError::InvalidAmount(amount));
    }
    Ok(lamports as u64)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Scale a UI token amount to base units, flooring any excess precision.
pub fn scale_token_amount(amount: f64, decimals: u8) -> Result<u64, DispatchError> {
    let scaled = (amount * 10f64.powi(decimals as i32)).floor();
    if !scaled.is_finite() || scaled < 0.0 || scaled > u64::MAX as f64 {
        return Err(DispatchError::InvalidAmount(amount));
    }
    Ok(scaled as u64)
}

/// Donation sent on top of a transfer: 1% of `lamports`, rounded down.
pub fn donation_lamports(lamports: u64) -> u64 {
    lamports / 100
}

pub fn send_sol_instructions(
    sender: &Pubkey,
    recipient: &Pubkey,
    lamports: u64,
    donation_address: Option<&Pubkey>,
) -> Vec<Instruction> {
    match donation_address {
        Some(donation_address) => vec![
            system_instruction::transfer(sender, recipient, lamports),
            system_instruction::transfer(sender, donation_address, donation_lamports(lamports)),
        ],
        None => vec![system_instruction::transfer(sender, recipient, lamports)],
    }
}

/// Instructions moving `amount` base units of `mint` between the owners'
/// associated token accounts, creating the recipient's account first when it
/// does not exist yet.
pub fn token_transfer_instructions(
    sender: &Pubkey,
    recipient: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    create_recipient_account: bool,
) -> Result<Vec<Instruction>, DispatchError> {
    let source = spl_associated_token_account::get_associated_token_address(sender, mint);
    let destination = spl_associated_token_account::get_associated_token_address(recipient, mint);

    let mut instructions = Vec::with_capacity(2);
    if create_recipient_account {
        instructions.push(
            spl_associated_token_account::instruction::create_associated_token_account(
                sender,
                recipient,
                mint,
                &spl_token::id(),
            ),
        );
    }
    instructions.push(
        spl_token::instruction::transfer(
            &spl_token::id(),
            &source,
            &destination,
            sender,
            &[],
            amount,
        )
        .map_err(|e| DispatchError::InstructionBuild(e.to_string()))?,
    );
    Ok(instructions)
}

/// Create, initialize and delegate a new stake account owned by `authority`.
pub fn stake_instructions(
    authority: &Pubkey,
    stake_account: &Pubkey,
    vote_account: &Pubkey,
    lamports: u64,
) -> Vec<Instruction> {
    vec![
        system_instruction::create_account(
            authority,
            stake_account,
            lamports,
            STAKE_ACCOUNT_SPACE,
            &stake::program::id(),
        ),
        stake::instruction::initialize(
            stake_account,
            &Authorized {
                staker: *authority,
                withdrawer: *authority,
            },
            &Lockup::default(),
        ),
        stake::instruction::delegate_stake(stake_account, authority, vote_account),
    ]
}

pub fn withdraw_stake_instruction(
    stake_account: &Pubkey,
    withdrawer: &Pubkey,
    destination: &Pubkey,
    lamports: u64,
) -> Instruction {
    stake::instruction::withdraw(stake_account, withdrawer, destination, lamports, None)
}

/// Build and sign a legacy transaction paid for by the first signer.
pub fn sign_legacy(
    instructions: &[Instruction],
    payer: &Keypair,
    extra_signers: &[&Keypair],
    recent_blockhash: Hash,
) -> Result<Transaction, DispatchError> {
    let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + extra_signers.len());
    signers.push(payer);
    signers.extend_from_slice(extra_signers);

    let mut tx = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
    tx.try_sign(signers.as_slice(), recent_blockhash)?;
    Ok(tx)
}

/// Build and sign a v0 versioned transaction paid for by `payer`.
pub fn sign_versioned(
    instructions: &[Instruction],
    payer: &Keypair,
    recent_blockhash: Hash,
) -> Result<VersionedTransaction, DispatchError> {
    let message = v0::Message::try_compile(&payer.pubkey(), instructions, &[], recent_blockhash)?;
    let tx = VersionedTransaction::try_new(VersionedMessage::V0(message), &[payer])?;
    Ok(tx)
}
