//! `gametrade-client` is an async client for the GameTrade marketplace
//! REST backend.
//!
//! The core pieces are:
//! - [`ApiClient`]: JSON over HTTP with linear-backoff retries
//! - [`AppConfig`] / [`ClientConfig`]: settings with per-key defaults
//! - [`Session`]: the logged-in user and its expiry clock
//! - [`Dispatcher`]: runs calls off the UI thread
//!
//! [`AccountService`], [`BuyerService`] and [`VendorService`] wrap the
//! backend endpoints with typed requests and responses.

mod accounts;
mod buyer;
mod client;
mod config;
mod dispatch;
mod error;
mod model;
mod query;
mod session;
mod vendor;

pub use accounts::AccountService;
pub use buyer::BuyerService;
pub use client::ApiClient;
pub use config::{
    AppConfig, ClientConfig, LogConfig, SessionConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE,
};
pub use dispatch::{Dispatcher, Pending};
pub use error::ClientError;
pub use model::{
    AdminAccount, BuyerAccount, BuyerProfile, BuyerProfileUpdate, BuyerRegistration, Game,
    GameApplication, GameDetails, GameUpdate, LibraryEntry, NewGame, Order, PersonalInfo,
    PersonalInfoUpdate, Review, Role, SalesRecord, User, VendorAccount, VendorGame,
    VendorProfile, VendorProfileUpdate, VendorRegistration,
};
pub use session::{Clock, Session, SystemClock};
pub use vendor::VendorService;

pub type Result<T> = std::result::Result<T, ClientError>;
