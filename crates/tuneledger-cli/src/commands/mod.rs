pub mod address;
pub mod discovery;
pub mod init;
pub mod keygen;
pub mod maintenance;
pub mod misc;
pub mod playlist;
pub mod profile;
pub mod record;
pub mod social;
pub mod track;

use tuneledger_core::{Client, Confirmation, Pubkey, Record, Signer, Transport, TuneLedgerError};

use crate::app::AppContext;
use crate::errors::CliError;
use crate::output::print_confirmation;

/// Fetch a record that must exist, naming it in the error when it does not.
pub(crate) fn fetch_required<R, T, K>(
    client: &Client<T, K>,
    address: &Pubkey,
    what: &str,
    hint: &str,
) -> anyhow::Result<R>
where
    R: Record,
    T: Transport,
    K: Signer,
{
    client.fetch::<R>(address)?.ok_or_else(|| {
        CliError::not_found(
            format!("No {} at {}", what, address),
            format!("Hint: {}", hint),
        )
        .into()
    })
}

/// Report an applied instruction; `--quiet` silences all but JSON output.
pub(crate) fn report(
    ctx: &AppContext,
    title: &str,
    confirmation: &Confirmation,
    items: &[(&str, String)],
) -> anyhow::Result<()> {
    let ui = ctx.ui();
    if ctx.quiet() && !ui.mode.is_json() {
        return Ok(());
    }
    print_confirmation(&ui, title, confirmation, items)
}

/// Attach a hint to `AlreadyInitialized` rejections; other errors pass through.
pub(crate) fn explain_duplicate(
    err: TuneLedgerError,
    message: String,
    hint: &str,
) -> anyhow::Error {
    if matches!(err.root_cause(), TuneLedgerError::AlreadyInitialized(_)) {
        CliError::rejected_with_hint(message, format!("Hint: {}", hint)).into()
    } else {
        err.into()
    }
}
