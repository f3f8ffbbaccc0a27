//! Transfer and recharge history formatting
//!
//! Register-style listings, most recent first.

use crate::models::{Envelope, RechargeRecord, TransferRecord};

use super::truncate;

/// Format one transfer as a register row
fn format_transfer_row(transfer: &TransferRecord, envelopes: &[Envelope], symbol: &str) -> String {
    let arrow = if transfer.is_inbound() { "←" } else { "→" };
    let envelope = transfer
        .linked_envelope_id
        .and_then(|id| envelopes.iter().find(|e| e.id == id))
        .map(|e| format!(" [{}]", e.name))
        .unwrap_or_default();

    format!(
        "{} {} {} {:11} {:>14}{}",
        arrow,
        transfer.created_at.format("%Y-%m-%d %H:%M"),
        truncate(&transfer.contact_name, 20),
        transfer.phone,
        transfer.signed_amount().format_with_symbol(symbol),
        envelope
    )
}

/// Format the transfer history
pub fn format_transfer_history(
    transfers: &[TransferRecord],
    envelopes: &[Envelope],
    symbol: &str,
) -> String {
    if transfers.is_empty() {
        return "No hay transferencias.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:16} {:20} {:11} {:>14}\n",
        "", "Fecha", "Contacto", "Teléfono", "Monto"
    ));
    output.push_str(&"-".repeat(67));
    output.push('\n');

    for transfer in transfers {
        output.push_str(&format_transfer_row(transfer, envelopes, symbol));
        output.push('\n');
        if let Some(note) = &transfer.note {
            output.push_str(&format!("    {}\n", note));
        }
    }

    output
}

/// Format the recharge history
pub fn format_recharge_history(recharges: &[RechargeRecord], symbol: &str) -> String {
    if recharges.is_empty() {
        return "No hay recargas.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:16} {:12} {:11} {:>14}\n",
        "Fecha", "Proveedor", "Teléfono", "Monto"
    ));
    output.push_str(&"-".repeat(56));
    output.push('\n');

    for recharge in recharges {
        output.push_str(&format!(
            "{} {} {:11} {:>14}\n",
            recharge.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&recharge.provider, 12),
            recharge.phone,
            recharge.amount.format_with_symbol(symbol)
        ));
    }

    output
}
