use crate::client::{FanableClient, Reply};
use crate::config::{FanableConfig, RunParams};
use crate::session::SessionAcquirer;
use crate::tasks::{TaskExecutor, TaskReport};
use crate::wallet::KeyPair;
use core_logic::{AuthError, NetworkError, ProxyManager, RunStats, Shutdown, WalletStore, TASK_RESULT};
use tracing::{error, info, warn};

/// How a single iteration ended.
#[derive(Debug)]
pub enum IterationOutcome {
    Completed { address: String, report: TaskReport },
    AuthFailed { address: String, error: AuthError },
    ClientFailed { address: String, error: NetworkError },
}

impl IterationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IterationOutcome::Completed { .. })
    }
}

pub struct Bot {
    config: FanableConfig,
    proxies: Vec<String>,
    store: WalletStore,
}

impl Bot {
    pub fn new(config: FanableConfig, proxies: Vec<String>) -> Self {
        let store = WalletStore::new(&config.addresses_file, &config.private_keys_file);
        Self {
            config,
            proxies,
            store,
        }
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    /// Runs the iterations strictly one after another. An interrupt drops the
    /// in-flight iteration or pause and ends the run.
    pub async fn run(&self, params: &RunParams, shutdown: &Shutdown) -> RunStats {
        let mut stats = RunStats::default();
        let total = params.iterations;
        let start_time = std::time::Instant::now();

        info!(target: TASK_RESULT, "Starting run: {} iterations", total);

        for iteration in 1..=total {
            info!(target: TASK_RESULT, "{}", "=".repeat(60));
            info!(target: TASK_RESULT, "  Iteration {} / {}", iteration, total);
            info!(target: TASK_RESULT, "{}", "=".repeat(60));

            let Some(outcome) = shutdown
                .guard(self.run_iteration(iteration as usize, params))
                .await
            else {
                warn!("Run interrupted during iteration {}", iteration);
                break;
            };

            match &outcome {
                IterationOutcome::Completed { report, .. } => {
                    stats.success += 1;
                    info!(
                        target: TASK_RESULT,
                        "Iteration {} SUCCESS - {}/{} calls accepted",
                        iteration,
                        report.succeeded(),
                        report.calls()
                    );
                }
                IterationOutcome::AuthFailed { error, .. } => {
                    stats.failed += 1;
                    error!("Iteration {} FAILED - token acquisition: {}", iteration, error);
                }
                IterationOutcome::ClientFailed { error, .. } => {
                    stats.failed += 1;
                    error!("Iteration {} FAILED - {}", iteration, error);
                }
            }

            if iteration < total {
                let delay = self.config.iteration_delay();
                warn!("Waiting {:.1}s before the next iteration...", delay.as_secs_f64());
                if !shutdown.pause(delay).await {
                    warn!("Run interrupted while waiting");
                    break;
                }
            }
        }

        info!(target: TASK_RESULT, "{}", "=".repeat(60));
        info!(
            target: TASK_RESULT,
            "Total Time: {:.1}s | Success: {} | Failed: {} | Success Rate: {:.2}%",
            start_time.elapsed().as_secs_f64(),
            stats.success,
            stats.failed,
            stats.success_rate()
        );
        info!(
            target: TASK_RESULT,
            "Wallets saved to {} and {}",
            self.store.addresses_path().display(),
            self.store.private_keys_path().display()
        );

        stats
    }

    pub async fn run_iteration(&self, iteration: usize, params: &RunParams) -> IterationOutcome {
        let proxy = ProxyManager::select(&self.proxies, iteration);
        match &proxy {
            Some(url) => info!(target: TASK_RESULT, "Using proxy: {}", url),
            None => warn!("No proxy in use"),
        }

        let key_pair = KeyPair::create();
        info!(target: TASK_RESULT, "🔐 Wallet generated: {}", key_pair.address());

        // Saved before any network call, whatever happens next
        match self.store.append(key_pair.address(), key_pair.private_key()) {
            Ok(()) => info!(target: TASK_RESULT, "Wallet SUCCESS - saved"),
            Err(e) => error!("Wallet save FAILED - {}", e),
        }

        tokio::time::sleep(self.config.post_wallet_delay()).await;

        let address = key_pair.address().to_string();
        let client = match FanableClient::new(&self.config, proxy.as_deref()) {
            Ok(client) => client,
            Err(error) => return IterationOutcome::ClientFailed { address, error },
        };

        info!(target: TASK_RESULT, "Signing and requesting auth token...");
        let session = match SessionAcquirer::new(&client, &self.config)
            .acquire(key_pair.address(), key_pair.private_key())
            .await
        {
            Ok(session) => session,
            Err(error) => return IterationOutcome::AuthFailed { address, error },
        };
        info!(target: TASK_RESULT, "Auth token SUCCESS");

        let report = TaskExecutor::new(&client, &self.config)
            .run_all(&session.token, &address, &params.referral_code)
            .await;

        if let Some(wallet) = &report.wallet {
            info!(target: TASK_RESULT, "Wallet details: {}", wallet.summary());
        }

        IterationOutcome::Completed { address, report }
    }
}
