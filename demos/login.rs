use gametrade_client::{AccountService, ApiClient, AppConfig, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("gametrade_client={}", config.log.level))),
        )
        .init();

    let account = std::env::var("GAMETRADE_ACCOUNT")?;
    let password = std::env::var("GAMETRADE_PASSWORD")?;

    let client = ApiClient::new(config.api.clone())?;
    let session = Session::from_config(&config.session);

    match AccountService::new(client).login(&account, &password).await? {
        Some(user) => {
            println!("welcome, {} ({})", user.display_name(), user.role().as_str());
            session.set_current_user(user);
            println!(
                "session expires in {} s",
                session.remaining_session_time().as_secs()
            );
        }
        None => eprintln!("account or password is wrong"),
    }

    Ok(())
}
