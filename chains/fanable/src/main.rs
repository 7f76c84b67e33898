use anyhow::{Context, Result};
use clap::Parser;
use core_logic::{setup_logger, ProxyManager, Shutdown, TASK_RESULT};
use dialoguer::Input;
use dotenv::dotenv;
use fanable::{Bot, FanableConfig, RunParams};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of referrals to send (prompted when omitted)
    #[arg(short = 'n', long)]
    count: Option<String>,

    /// Referral code to submit (prompted when omitted)
    #[arg(short, long)]
    referral_code: Option<String>,
}

fn prompt(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("Failed to read '{}'", label))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let config = FanableConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    let _guard = setup_logger(&config.log_dir);

    info!(target: TASK_RESULT, "Fanable Bot v{}", env!("CARGO_PKG_VERSION"));

    let proxies = ProxyManager::load(&config.proxy_file);

    let count = match args.count {
        Some(count) => count,
        None => prompt("Number of referrals to send")?,
    };
    let referral_code = match args.referral_code {
        Some(code) => code,
        None => prompt("Referral code")?,
    };

    let params = match RunParams::parse(&count, &referral_code) {
        Ok(params) => params,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    shutdown.listen_ctrl_c();

    let stats = Bot::new(config, proxies).run(&params, &shutdown).await;
    if shutdown.is_triggered() {
        info!(target: TASK_RESULT, "Stopped by user after {} iterations", stats.total());
    } else {
        info!(target: TASK_RESULT, "✅ All iterations finished");
    }

    Ok(())
}
