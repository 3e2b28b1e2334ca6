use tuneledger_core::RecordStore;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::{badge, header, hint, kv, print, simple_table, Badge, Column};

/// Recount every relationship record and compare against the stored counters.
pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    let violations = ledger.check_integrity()?;
    let records = ledger.store().len()?;
    let ui = ctx.ui();

    if ui.mode.is_json() {
        let items: Vec<_> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "address": v.address.to_string(),
                    "kind": v.kind,
                    "field": v.field,
                    "expected": v.expected,
                    "actual": v.actual,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "ok": violations.is_empty(),
            "records": records,
            "violations": items,
        }))?;
    } else if violations.is_empty() {
        if !ctx.quiet() {
            print(&ui, &header(&ui, "check", Some(&format!("{} records", records))));
            print(&ui, &badge(&ui, Badge::Ok, "Integrity check: OK"));
            print(&ui, &kv(&ui, "Records", &records.to_string()));
        }
    } else {
        eprintln!("{}", badge(&ui, Badge::Err, "Integrity check: FAILED"));
        let columns = [
            Column::new("Kind"),
            Column::new("Address"),
            Column::new("Field"),
            Column::new("Stored"),
            Column::new("Counted"),
        ];
        let rows: Vec<Vec<String>> = violations
            .iter()
            .map(|v| {
                tracing::debug!(violation = %v, "Counter mismatch");
                vec![
                    v.kind.to_string(),
                    v.address.short(),
                    v.field.to_string(),
                    v.actual.to_string(),
                    v.expected.to_string(),
                ]
            })
            .collect();
        eprintln!("{}", simple_table(&ui, &columns, &rows));
        eprintln!(
            "{}",
            hint(&ui, "Counters drifted from their relationship records; restore from a backup.")
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CliError::IntegrityFailed(violations.len()).into())
    }
}
