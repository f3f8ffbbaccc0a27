//! Guided demo
//!
//! Runs two scenarios on a fresh store: an outbound transfer to a new
//! contact, and an inbound transfer routed into an envelope by an automation.

use tracing::info;

use crate::config::Settings;
use crate::display::{format_contact_list, format_envelope_list, format_transfer_history};
use crate::error::{BankError, BankResult};
use crate::models::{AutomationDraft, EnvelopeDraft, Money, TransferDraft};
use crate::services::{AutomationService, EnvelopeService, TransferService};
use crate::storage::BankStore;

/// Run both demo scenarios
pub fn run_demo(settings: &Settings) -> BankResult<()> {
    send_scenario(settings)?;
    println!();
    automation_scenario(settings)?;
    Ok(())
}

fn send_scenario(settings: &Settings) -> BankResult<()> {
    let store = BankStore::new(settings.clone());
    let symbol = settings.currency_symbol.as_str();

    println!("== Transferencia a un contacto nuevo ==");
    println!(
        "Saldo inicial: {}",
        store.balance()?.format_with_symbol(symbol)
    );

    let transfer = TransferService::new(&store).send_transfer(TransferDraft::new(
        "X",
        "60001111",
        Money::from_units(1000),
    ))?;
    info!(transfer = %transfer.id, "demo transfer sent");

    println!(
        "Enviaste {} a {} ({})",
        transfer.amount.format_with_symbol(symbol),
        transfer.contact_name,
        transfer.phone
    );
    println!(
        "Saldo final:   {}",
        store.balance()?.format_with_symbol(symbol)
    );
    print!("{}", format_contact_list(&store.contacts()?));
    Ok(())
}

fn automation_scenario(settings: &Settings) -> BankResult<()> {
    let store = BankStore::new(settings.clone());
    let symbol = settings.currency_symbol.as_str();

    println!("== Automatización de sobres ==");
    let renta = EnvelopeService::new(&store).create_envelope(EnvelopeDraft::new("Renta"))?;
    let rule = AutomationService::new(&store)
        .create_automation_rule(AutomationDraft::new("88881212", renta.id))?;
    println!("Regla '{}' creada para {}", rule.title, rule.match_phone);

    let received = TransferService::new(&store).receive_transfer(TransferDraft::new(
        "Jefe",
        "8888-1212",
        Money::from_units(5000),
    ))?;

    let firing = received.automation.ok_or_else(|| {
        BankError::Validation("La automatización no se activó".into())
    })?;
    println!(
        "{} apartó {} en '{}'",
        firing.rule_title,
        firing.amount.format_with_symbol(symbol),
        firing.envelope_name
    );

    let envelopes = store.envelopes()?;
    print!("{}", format_envelope_list(&envelopes, symbol));
    print!(
        "{}",
        format_transfer_history(&store.transfers()?, &envelopes, symbol)
    );
    Ok(())
}
