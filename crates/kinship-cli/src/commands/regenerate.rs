//! Regenerate-all command implementation.

use super::Services;
use crate::cli::RegenerateArgs;
use crate::error::Result;
use crate::output::Formatter;
use kinship_regen::Regenerator;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Execute the regenerate-all command.
///
/// Ctrl+C cancels the pass; subjects already running still finish.
pub async fn execute_regenerate_all(
    args: RegenerateArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let mut config = services.regen.clone();
    if let Some(max_concurrent) = args.max_concurrent {
        config.max_concurrent = max_concurrent;
    }
    config.dry_run |= args.dry_run;

    let mut regenerator = Regenerator::with_suggestions(
        Arc::clone(&services.store),
        Arc::clone(&services.suggestions),
        config,
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = regenerator.regenerate_all(&cancel).await;
    watcher.abort();
    let pass = result?;

    if pass.skipped > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("Interrupted: {} subject(s) not regenerated", pass.skipped))
        );
    }
    println!("{}", formatter.format_metrics(&pass)?);
    Ok(())
}
