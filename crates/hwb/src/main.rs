use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use hwb_core::{
    api::client::PracticumClient,
    config::Config,
    poller::{PollState, Poller},
};
use hwb_telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hwb_core::logging::init("hwb")?;

    let cfg = Config::load()?;
    tracing::debug!(?cfg, "configuration loaded");

    let api = Arc::new(PracticumClient::from_config(&cfg)?);
    let notifier = Arc::new(TelegramNotifier::from_token(cfg.telegram_token.clone()));

    if let Some(name) = notifier.username().await {
        tracing::info!("hwb started: @{name}");
    }
    tracing::info!(endpoint = api.endpoint(), chat_id = cfg.chat_id.0, "polling homework statuses");

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("interrupt received, stopping");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "cannot listen for ctrl-c"),
            }
        });
    }

    let poller = Poller::new(api, notifier, cfg.chat_id, cfg.retry_period);
    let mut state = PollState::starting_now();
    poller.run(&mut state, &cancel).await?;

    Ok(())
}
