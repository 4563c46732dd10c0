use tracing::{info, warn};

use crate::app::state::{Action, AppStore};
use crate::domain::model::{TransactionStatus, WalletConnection};
use crate::infra::wallet::WalletProvider;

/// Connects through `provider` and replaces the wallet state.
pub async fn connect_wallet(
    store: &AppStore,
    provider: &dyn WalletProvider,
) -> anyhow::Result<WalletConnection> {
    match provider.request_account().await {
        Ok(wallet) => {
            info!(address = %wallet.address, "wallet connected");
            store.dispatch(Action::WalletConnected(wallet.clone())).await;
            store
                .log(TransactionStatus::Success, "Wallet connected successfully")
                .await;
            Ok(wallet)
        }
        Err(e) => {
            warn!(error = %e, "wallet connection failed");
            store
                .log(TransactionStatus::Fail, format!("Wallet connection failed: {}", e))
                .await;
            Err(e)
        }
    }
}

pub async fn disconnect_wallet(store: &AppStore) -> WalletConnection {
    store.dispatch(Action::WalletDisconnected).await;
    store.wallet().await
}
