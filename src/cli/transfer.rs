//! Transfer and recharge CLI commands

use clap::Args;

use crate::display::{format_recharge_history, format_transfer_history};
use crate::error::BankResult;
use crate::models::{RechargeDraft, TransferDraft};
use crate::services::{RechargeService, TransferService};
use crate::storage::BankStore;

use super::parse_amount;

/// Arguments shared by `send` and `receive`
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Contact name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Amount (e.g. "1000" or "1000.50")
    pub amount: String,
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for `recharge`
#[derive(Args, Debug)]
pub struct RechargeArgs {
    /// Carrier name
    pub provider: String,
    /// Phone number to recharge
    pub phone: String,
    /// Amount
    pub amount: String,
}

/// Handle `send` or `receive`
pub fn handle_transfer_command(store: &BankStore, args: TransferArgs, inbound: bool) -> BankResult<()> {
    let service = TransferService::new(store);
    let symbol = store.settings().currency_symbol.as_str();

    let mut draft = TransferDraft::new(args.name, args.phone, parse_amount(&args.amount)?);
    draft.note = args.note;

    if inbound {
        let received = service.receive_transfer(draft)?;
        let transfer = &received.transfer;
        println!(
            "Recibiste {} de {} ({})",
            transfer.amount.format_with_symbol(symbol),
            transfer.contact_name,
            transfer.phone
        );
        if let Some(firing) = &received.automation {
            println!(
                "  {} apartó el monto en '{}' (saldo del sobre: {})",
                firing.rule_title,
                firing.envelope_name,
                firing.envelope_balance.format_with_symbol(symbol)
            );
        }
    } else {
        let transfer = service.send_transfer(draft)?;
        println!(
            "Enviaste {} a {} ({})",
            transfer.amount.format_with_symbol(symbol),
            transfer.contact_name,
            transfer.phone
        );
    }

    println!(
        "Saldo disponible: {}",
        store.balance()?.format_with_symbol(symbol)
    );
    Ok(())
}

/// Handle `recharge`
pub fn handle_recharge_command(store: &BankStore, args: RechargeArgs) -> BankResult<()> {
    let symbol = store.settings().currency_symbol.as_str();
    let record = RechargeService::new(store).make_recharge(RechargeDraft::new(
        args.provider,
        args.phone,
        parse_amount(&args.amount)?,
    ))?;

    println!(
        "Recarga de {} a {} ({})",
        record.amount.format_with_symbol(symbol),
        record.phone,
        record.provider
    );
    println!(
        "Saldo disponible: {}",
        store.balance()?.format_with_symbol(symbol)
    );
    Ok(())
}

/// Handle `history`
pub fn handle_history_command(store: &BankStore, recharges: bool) -> BankResult<()> {
    let symbol = store.settings().currency_symbol.as_str();
    if recharges {
        print!(
            "{}",
            format_recharge_history(&RechargeService::new(store).history()?, symbol)
        );
    } else {
        print!(
            "{}",
            format_transfer_history(
                &TransferService::new(store).history()?,
                &store.envelopes()?,
                symbol
            )
        );
    }
    Ok(())
}
