use mediqr_service::infra::config::ServiceConfig;
use mediqr_service::{MedicineStore, PinataClient, PostgresMedicineStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           PINATA_API_KEY, PINATA_SECRET_API_KEY\n\
         Optional:\n\
           PINATA_API_URL, DATABASE_URL, PORT, WALLET_DELAY_MS, PINNING_TIMEOUT_SECS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if missing)
    let config = ServiceConfig::from_env()?;

    println!("> Preflight:");
    println!("  PINATA_API_URL={}", config.pinata_api_url);
    println!("  PORT={}", config.port);
    println!("  PINNING_TIMEOUT_SECS={}", config.pinning_timeout.as_secs());

    // Pinning credentials
    let pinata = PinataClient::from_config(&config)?;
    pinata.test_authentication().await?;
    println!("  Pinata credentials accepted.");

    // Document store
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresMedicineStore::connect(url).await?;
            store.ping().await?;
            let count = store.list_newest_first().await?.len();
            println!("  Postgres reachable, `medicines` table ready ({} documents).", count);
        }
        None => {
            println!("  DATABASE_URL not set: documents will be kept in memory.");
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
