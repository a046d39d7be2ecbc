//! Polls a background catalog search the way a UI frame loop would.

use std::{task::Poll, thread, time::Duration};

use gametrade_client::{ApiClient, BuyerService, ClientConfig, Dispatcher};

fn main() -> anyhow::Result<()> {
    let query = std::env::args().nth(1).unwrap_or_default();

    let dispatcher = Dispatcher::new()?;
    let buyers = BuyerService::new(ApiClient::new(ClientConfig::load())?);

    let pending = dispatcher.spawn(async move { buyers.search_by_name(&query).await });

    let mut frames = 0u32;
    let games = loop {
        match pending.try_take() {
            Poll::Ready(result) => break result??,
            Poll::Pending => {
                frames += 1;
                thread::sleep(Duration::from_millis(16));
            }
        }
    };

    println!("{} game(s) after {frames} frame(s)", games.len());
    for game in games {
        println!(
            "{:<24} {:<12} {:>8}",
            game.game_name,
            game.category.as_deref().unwrap_or("-"),
            game.price
                .map(|price| format!("{price:.2}"))
                .unwrap_or_else(|| "free".to_owned()),
        );
    }

    Ok(())
}
