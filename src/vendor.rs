use serde::Serialize;

use crate::{
    query::{required, with_query},
    ApiClient, GameApplication, GameUpdate, NewGame, Result, Review, SalesRecord, VendorGame, VendorProfile,
    VendorProfileUpdate,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountRef<'a> {
    account: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameRef<'a> {
    account: &'a str,
    game_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationQuery<'a> {
    account: &'a str,
    approval_status: &'a str,
}

/// Game management calls under `/vendors`.
#[derive(Clone, Debug)]
pub struct VendorService {
    client: ApiClient,
}

impl VendorService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every game owned by the vendor account.
    pub async fn games(&self, account: &str) -> Result<Vec<VendorGame>> {
        self.query_games(account, None).await
    }

    /// Games in one shelf state, e.g. `"上架"` for published ones.
    pub async fn games_with_status(&self, account: &str, status: &str) -> Result<Vec<VendorGame>> {
        let status = required("status", status)?;
        self.query_games(account, Some(&status)).await
    }

    async fn query_games(&self, account: &str, status: Option<&str>) -> Result<Vec<VendorGame>> {
        let account = required("account", account)?;
        let request = AccountRef {
            account: &account,
            status,
        };
        self.client
            .post("/vendors/query-vendor-games", &request)
            .await
    }

    pub async fn create_game(&self, game: &NewGame) -> Result<String> {
        required("account", &game.account)?;
        required("game name", &game.game_name)?;
        self.client.post_text("/vendors/create-game", game).await
    }

    pub async fn update_game(&self, update: &GameUpdate) -> Result<String> {
        required("account", &update.account)?;
        required("game name", &update.game_name)?;
        self.client.put_text("/vendors/update-game", update).await
    }

    /// Unpublishes a game; the backend answers with a message.
    pub async fn take_off_shelf(&self, account: &str, game_name: &str) -> Result<String> {
        let account = required("account", account)?;
        let game_name = required("game name", game_name)?;
        let request = GameRef {
            account: &account,
            game_name: &game_name,
        };
        self.client
            .post_text("/vendors/game-off-shelf", &request)
            .await
    }

    pub async fn reviews(&self, account: &str, game_name: &str) -> Result<Vec<Review>> {
        let account = required("account", account)?;
        let game_name = required("game name", game_name)?;
        let request = GameRef {
            account: &account,
            game_name: &game_name,
        };
        self.client
            .post("/vendors/query-game-reviews", &request)
            .await
    }

    pub async fn sales(&self, account: &str) -> Result<Vec<SalesRecord>> {
        let account = required("account", account)?;
        let request = AccountRef {
            account: &account,
            status: None,
        };
        self.client
            .post("/vendors/query-game-sales", &request)
            .await
    }

    /// Every listing application filed under the vendor's company.
    pub async fn applications(&self, account: &str) -> Result<Vec<GameApplication>> {
        let account = required("account", account)?;
        let request = AccountRef {
            account: &account,
            status: None,
        };
        let applications: Option<Vec<GameApplication>> = self
            .client
            .post("/vendors/query-applications-by-company", &request)
            .await?;
        Ok(applications.unwrap_or_default())
    }

    /// Applications in one review state: `待审批`, `通过` or `拒绝`.
    pub async fn applications_with_status(
        &self,
        account: &str,
        approval_status: &str,
    ) -> Result<Vec<GameApplication>> {
        let account = required("account", account)?;
        let approval_status = required("approval status", approval_status)?;
        let request = ApplicationQuery {
            account: &account,
            approval_status: &approval_status,
        };
        let applications: Option<Vec<GameApplication>> = self
            .client
            .post("/vendors/query-game-applications", &request)
            .await?;
        Ok(applications.unwrap_or_default())
    }

    /// Withdraws a pending application.
    ///
    /// DELETE carries no body, so the account and id travel in the query.
    /// Returns `false` when the backend refuses (any status but 200/204).
    pub async fn cancel_application(&self, account: &str, application_id: i64) -> Result<bool> {
        let account = required("account", account)?;
        let id = application_id.to_string();
        let path = with_query(
            "/vendors/cancel-game-application",
            &[("account", account.as_str()), ("applicationId", id.as_str())],
        );
        self.client.delete(&path).await
    }

    pub async fn personal_info(&self, account: &str) -> Result<VendorProfile> {
        let account = required("account", account)?;
        let path = with_query("/vendors/personal-info", &[("account", account.as_str())]);
        self.client.get(&path).await
    }

    pub async fn update_personal_info(
        &self,
        account: &str,
        update: &VendorProfileUpdate,
    ) -> Result<String> {
        let account = required("account", account)?;
        let path = with_query("/vendors/personal-info", &[("account", account.as_str())]);
        self.client.put_text(&path, update).await
    }
}
