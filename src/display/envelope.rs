//! Envelope and automation display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{AutomationRule, Envelope};

const PROGRESS_WIDTH: usize = 10;

#[derive(Tabled)]
struct EnvelopeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Sobre")]
    name: String,
    #[tabled(rename = "Saldo")]
    balance: String,
    #[tabled(rename = "Meta")]
    target: String,
    #[tabled(rename = "Progreso")]
    progress: String,
}

#[derive(Tabled)]
struct AutomationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Título")]
    title: String,
    #[tabled(rename = "Teléfono")]
    phone: String,
    #[tabled(rename = "Sobre")]
    envelope: String,
    #[tabled(rename = "Estado")]
    status: &'static str,
    #[tabled(rename = "Última vez")]
    last_triggered: String,
}

/// Text progress bar: `[####------] 40%`
fn progress_bar(percent: u8) -> String {
    let filled = (percent as usize * PROGRESS_WIDTH) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

/// Format envelopes as a table with a total row
pub fn format_envelope_list(envelopes: &[Envelope], symbol: &str) -> String {
    if envelopes.is_empty() {
        return "No hay sobres. Cree uno con 'envelope create <nombre>'.\n".to_string();
    }

    let rows = envelopes.iter().map(|e| EnvelopeRow {
        id: e.id.to_string(),
        name: e.name.clone(),
        balance: e.balance.format_with_symbol(symbol),
        target: e
            .target_amount
            .map(|t| t.format_with_symbol(symbol))
            .unwrap_or_default(),
        progress: e.progress_percent().map(progress_bar).unwrap_or_default(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let total = crate::models::Money::checked_sum(envelopes.iter().map(|e| e.balance))
        .map(|t| t.format_with_symbol(symbol))
        .unwrap_or_else(|| "fuera de rango".to_string());
    format!("{}\nTotal en sobres: {}\n", table, total)
}

/// Format one envelope's details
pub fn format_envelope_details(envelope: &Envelope, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Sobre: {}\n", envelope.name));
    output.push_str(&format!("  ID:          {}\n", envelope.id));
    output.push_str(&format!("  Color:       {}\n", envelope.color));
    output.push_str(&format!(
        "  Saldo:       {}\n",
        envelope.balance.format_with_symbol(symbol)
    ));

    if let Some(target) = envelope.target_amount {
        output.push_str(&format!("  Meta:        {}\n", target.format_with_symbol(symbol)));
        if let Some(percent) = envelope.progress_percent() {
            output.push_str(&format!("  Progreso:    {}\n", progress_bar(percent)));
        }
        if let Some(remaining) = envelope.remaining_to_target() {
            output.push_str(&format!(
                "  Faltan:      {}\n",
                remaining.format_with_symbol(symbol)
            ));
        }
    }

    if let Some(description) = &envelope.description {
        output.push_str(&format!("  Descripción: {}\n", description));
    }

    output.push_str(&format!(
        "  Actualizado: {}\n",
        envelope.updated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    output
}

/// Format automation rules, resolving envelope names
pub fn format_automation_list(rules: &[AutomationRule], envelopes: &[Envelope]) -> String {
    if rules.is_empty() {
        return "No hay automatizaciones.\n".to_string();
    }

    let rows = rules.iter().map(|rule| AutomationRow {
        id: rule.id.to_string(),
        title: rule.title.clone(),
        phone: rule.match_phone.clone(),
        envelope: envelopes
            .iter()
            .find(|e| e.id == rule.envelope_id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| rule.envelope_id.to_string()),
        status: if rule.active { "activa" } else { "pausada" },
        last_triggered: rule
            .last_triggered_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "nunca".to_string()),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
