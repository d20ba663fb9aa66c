// src/main.rs

use genlaunch::errors::LaunchError;
use genlaunch::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        if let Some(LaunchError::NonZeroExit(code)) = err.downcast_ref::<LaunchError>() {
            std::process::exit(if *code > 0 { *code } else { 1 });
        }
        eprintln!("genlaunch error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await?;
    Ok(())
}
