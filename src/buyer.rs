use serde::Serialize;

use crate::{
    query::{required, with_query},
    ApiClient, BuyerProfile, BuyerProfileUpdate, Game, GameDetails, LibraryEntry, Order, Result,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRequest<'a> {
    buyer_nickname: &'a str,
    game_name: &'a str,
}

/// Catalog, order and library calls under `/buyers`.
#[derive(Clone, Debug)]
pub struct BuyerService {
    client: ApiClient,
}

impl BuyerService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Games whose name matches `name`; an empty name lists the whole catalog.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Game>> {
        let path = with_query("/buyers/games/search-by-name", &[("gameName", name.trim())]);
        self.client.get(&path).await
    }

    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Game>> {
        let category = required("category", category)?;
        let path = with_query("/buyers/games/search-by-category", &[("category", category.as_str())]);
        self.client.get(&path).await
    }

    pub async fn search_by_popularity(&self, min_popularity: u64) -> Result<Vec<Game>> {
        let min = min_popularity.to_string();
        let path = with_query(
            "/buyers/games/search-by-popularity",
            &[("minPopularity", min.as_str())],
        );
        self.client.get(&path).await
    }

    /// Games matching the buyer's followed categories.
    ///
    /// A buyer who follows nothing gets an empty list.
    pub async fn search_by_preference(&self, buyer_nickname: &str) -> Result<Vec<Game>> {
        let nickname = required("buyer nickname", buyer_nickname)?;
        let path = with_query(
            "/buyers/games/search-by-preference",
            &[("buyerNickname", nickname.as_str())],
        );
        let games: Option<Vec<Game>> = self.client.get(&path).await?;
        Ok(games.unwrap_or_default())
    }

    pub async fn game_details(&self, game_name: &str) -> Result<GameDetails> {
        let game_name = required("game name", game_name)?;
        let path = with_query("/buyers/games/details", &[("gameName", game_name.as_str())]);
        self.client.get(&path).await
    }

    /// Creates an unpaid order and returns the backend's acknowledgement.
    pub async fn place_order(&self, buyer_nickname: &str, game_name: &str) -> Result<String> {
        let nickname = required("buyer nickname", buyer_nickname)?;
        let game_name = required("game name", game_name)?;
        let request = OrderRequest {
            buyer_nickname: &nickname,
            game_name: &game_name,
        };
        self.client.post_text("/buyers/orders", &request).await
    }

    pub async fn orders(&self, buyer_nickname: &str) -> Result<Vec<Order>> {
        let nickname = required("buyer nickname", buyer_nickname)?;
        let path = with_query("/buyers/orders", &[("buyerNickname", nickname.as_str())]);
        self.client.get(&path).await
    }

    pub async fn pay_order(&self, order_id: &str) -> Result<String> {
        self.order_action("/buyers/orders/pay", order_id).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<String> {
        self.order_action("/buyers/orders/cancel", order_id).await
    }

    async fn order_action(&self, endpoint: &str, order_id: &str) -> Result<String> {
        let order_id = required("order id", order_id)?;
        let path = with_query(endpoint, &[("orderId", order_id.as_str())]);
        self.client
            .put_text(&path, &serde_json::Map::new())
            .await
    }

    pub async fn library(&self, buyer_nickname: &str) -> Result<Vec<LibraryEntry>> {
        let nickname = required("buyer nickname", buyer_nickname)?;
        let path = with_query("/buyers/game-library", &[("buyerNickname", nickname.as_str())]);
        self.client.get(&path).await
    }

    pub async fn personal_info(&self, account: &str) -> Result<BuyerProfile> {
        let account = required("account", account)?;
        let path = with_query("/buyers/personal-info", &[("account", account.as_str())]);
        self.client.get(&path).await
    }

    /// Saves gender and birthday; the backend answers with a message.
    pub async fn save_personal_info(
        &self,
        account: &str,
        update: &BuyerProfileUpdate,
    ) -> Result<String> {
        let account = required("account", account)?;
        let path = with_query("/buyers/personal-info", &[("account", account.as_str())]);
        self.client.post_text(&path, update).await
    }
}
