// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use log::warn;

use crate::errors::MsaFetchError;
use crate::retry::CancelToken;

/// Exit status after a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Cancels `token` on the first Ctrl-C; a second one exits immediately, since a request in
/// flight is only abandoned once it returns.
pub fn install_interrupt_handler(token: CancelToken) -> Result<(), MsaFetchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::spawn(move || {
        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            warn!("Interrupted; stopping before the next request (Ctrl-C again to quit now)");
            token.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        });
    });
    Ok(())
}
