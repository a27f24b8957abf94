mod app;
mod events;
mod logging;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use terminal::TerminalGuard;
use tracing::info;

fn main() -> Result<()> {
    let _log_guard = logging::init()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    info!(target: "tui", "starting; logs in {}", logging::log_dir().display());

    let mut app = app::App::new(runtime.handle().clone());
    let mut term = TerminalGuard::new()?;
    let res = events::run(&mut term.terminal, &mut app);
    drop(term);
    runtime.shutdown_background();
    info!(target: "tui", "exit");
    res
}
