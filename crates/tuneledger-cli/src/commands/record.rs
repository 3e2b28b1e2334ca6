use tuneledger_core::AnyRecord;

use crate::app::AppContext;
use crate::cli::RecordArgs;
use crate::errors::CliError;
use crate::helpers::parse_pubkey;
use crate::output::print_record;

/// Decode whatever record lives at an address.
pub fn handle_record(ctx: &AppContext, args: &RecordArgs) -> anyhow::Result<()> {
    let ledger = ctx.open_ledger()?;
    let address = parse_pubkey("address", &args.address)?;
    let bytes = ledger.read(&address)?.ok_or_else(|| {
        CliError::not_found(
            format!("No record at {}", address),
            "Hint: Derive addresses with `tuneledger address <KIND> ...`.",
        )
    })?;
    let record = AnyRecord::decode(&bytes)?;
    print_record(&ctx.ui(), &address, &record)
}
