use tuneledger_core::{Keypair, Signer};

use crate::app::{write_keypair, AppContext};
use crate::cli::KeygenArgs;
use crate::output::print_json;
use crate::ui::receipt;

pub fn handle_keygen(ctx: &AppContext, args: &KeygenArgs) -> anyhow::Result<()> {
    let path = match args.out.as_deref() {
        Some(out) => std::path::PathBuf::from(out),
        None => ctx.keypair_path()?,
    };
    let keypair = Keypair::generate();
    write_keypair(&path, &keypair, args.force)?;
    tracing::debug!(path = %path.display(), "Key file written");

    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "pubkey": keypair.pubkey().to_string(),
            "path": path.display().to_string(),
        }));
    }
    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui,
                "Key generated",
                &[
                    ("Pubkey", keypair.pubkey().to_string()),
                    ("Path", path.display().to_string()),
                ],
            )
        );
    }
    Ok(())
}
