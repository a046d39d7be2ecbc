use std::time::Duration;

use gametrade_client::{
    AccountService, ApiClient, BuyerService, ClientConfig, Session, VendorService,
};

struct LiveBackend {
    base_url: String,
    account: String,
    password: String,
}

/// Reads `GAMETRADE_LIVE_URL`, `GAMETRADE_LIVE_ACCOUNT` and
/// `GAMETRADE_LIVE_PASSWORD`.
fn load_live_backend() -> Result<LiveBackend, String> {
    let var = |name: &str| {
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| format!("missing {name} environment variable"))
    };
    Ok(LiveBackend {
        base_url: var("GAMETRADE_LIVE_URL")?,
        account: var("GAMETRADE_LIVE_ACCOUNT")?,
        password: var("GAMETRADE_LIVE_PASSWORD")?,
    })
}

#[tokio::test]
async fn live_login_and_browse() {
    let backend = match load_live_backend() {
        Ok(backend) => backend,
        Err(reason) => {
            eprintln!("skipping live test: {reason}");
            return;
        }
    };

    let client = ApiClient::new(ClientConfig {
        max_retries: 2,
        retry_delay_ms: 200,
        ..ClientConfig::new(backend.base_url.trim_end_matches('/'))
    })
    .expect("client must build");
    let session = Session::new(Duration::from_secs(300));

    let user = AccountService::new(client.clone())
        .login(&backend.account, &backend.password)
        .await
        .expect("login request must complete")
        .expect("live credentials must be accepted");
    session.set_current_user(user.clone());
    assert!(session.is_logged_in());

    let account = session.account().expect("session must hold the account");
    match user.nickname() {
        Some(nickname) => {
            BuyerService::new(client.clone())
                .search_by_name("")
                .await
                .expect("catalog listing must succeed");
            BuyerService::new(client)
                .orders(nickname)
                .await
                .expect("order listing must succeed");
        }
        None => {
            VendorService::new(client)
                .games(&account)
                .await
                .expect("vendor game listing must succeed");
        }
    }

    session.logout();
    assert!(!session.is_logged_in());
}
