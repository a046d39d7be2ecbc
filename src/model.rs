//! Request and response shapes for the GameTrade backend.
//!
//! Field names follow the backend's camelCase JSON. Response fields the
//! backend may omit are `Option` or defaulted.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Account role as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Buyer,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }
}

/// Authenticated user returned by `/users/login`.
///
/// Serialized with a `role` tag. When decoding, a payload without `role` is
/// still accepted: vendor-only fields make it a vendor, anything else is a
/// buyer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Buyer(BuyerAccount),
    Vendor(VendorAccount),
    Admin(AdminAccount),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(alias = "username")]
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(alias = "username")]
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(alias = "username")]
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

const ROLES: &[&str] = &["buyer", "vendor", "admin"];
const VENDOR_FIELDS: &[&str] = &["companyName", "registeredAddress", "contactPerson"];

impl<'de> Deserialize<'de> for User {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let role = match value.get("role") {
            None | Some(Value::Null) => infer_role(&value),
            Some(Value::String(role)) => match role.as_str() {
                "buyer" => Role::Buyer,
                "vendor" => Role::Vendor,
                "admin" => Role::Admin,
                other => return Err(de::Error::unknown_variant(other, ROLES)),
            },
            Some(other) => {
                return Err(de::Error::custom(format!("role must be a string, got {other}")))
            }
        };

        match role {
            Role::Buyer => serde_json::from_value(value).map(User::Buyer),
            Role::Vendor => serde_json::from_value(value).map(User::Vendor),
            Role::Admin => serde_json::from_value(value).map(User::Admin),
        }
        .map_err(de::Error::custom)
    }
}

fn infer_role(value: &Value) -> Role {
    let has_vendor_field = VENDOR_FIELDS
        .iter()
        .any(|field| value.get(field).is_some_and(|v| !v.is_null()));
    if has_vendor_field {
        Role::Vendor
    } else {
        Role::Buyer
    }
}

impl User {
    pub fn role(&self) -> Role {
        match self {
            Self::Buyer(_) => Role::Buyer,
            Self::Vendor(_) => Role::Vendor,
            Self::Admin(_) => Role::Admin,
        }
    }

    pub fn account(&self) -> &str {
        match self {
            Self::Buyer(user) => &user.account,
            Self::Vendor(user) => &user.account,
            Self::Admin(user) => &user.account,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Buyer(user) => user.id,
            Self::Vendor(user) => user.id,
            Self::Admin(user) => user.id,
        }
    }

    pub fn contact(&self) -> Option<&str> {
        match self {
            Self::Buyer(user) => user.contact.as_deref(),
            Self::Vendor(user) => user.contact.as_deref(),
            Self::Admin(user) => user.contact.as_deref(),
        }
    }

    /// Buyer nickname; vendors and admins have none.
    pub fn nickname(&self) -> Option<&str> {
        match self {
            Self::Buyer(user) => user.nickname.as_deref(),
            _ => None,
        }
    }

    /// Name to greet the user with: nickname, company name, or account.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Buyer(user) => user.nickname.as_deref().unwrap_or(&user.account),
            Self::Vendor(user) => user.company_name.as_deref().unwrap_or(&user.account),
            Self::Admin(user) => &user.account,
        }
    }
}

/// Buyer sign-up form for `/users/register/buyer`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuyerRegistration {
    pub account: String,
    pub password: String,
    pub contact: String,
    pub nickname: String,
}

/// Vendor sign-up form for `/users/register/vendor`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VendorRegistration {
    pub account: String,
    pub password: String,
    pub contact: String,
    pub company_name: String,
    pub registered_address: String,
    pub contact_person: String,
}

/// Profile returned by `/users/personal-info`; fields depend on the role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub account: Option<String>,
    pub contact: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub company_name: Option<String>,
    pub registered_address: Option<String>,
    pub contact_person: Option<String>,
}

/// Partial profile edit for `/users/personal-info`; `None` fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
}

impl PersonalInfoUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Catalog entry from the `/buyers/games/search-by-*` endpoints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Game {
    pub game_name: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub sales_volume: Option<u64>,
    pub score: Option<f64>,
}

/// Full record from `/buyers/games/details`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameDetails {
    pub game_name: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub sales_volume: Option<u64>,
    pub score: Option<f64>,
    pub license_number: Option<String>,
    pub release_time: Option<String>,
}

/// Purchase record from `/buyers/orders`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    pub buyer_nickname: Option<String>,
    pub game_name: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub order_status: Option<String>,
    pub order_time: Option<String>,
    pub payment_time: Option<String>,
}

/// Owned game from `/buyers/game-library`, with the buyer's own review.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryEntry {
    pub game_name: String,
    pub license_number: Option<String>,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub review_time: Option<String>,
}

/// Buyer profile from `/buyers/personal-info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyerProfile {
    pub account: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub contact: Option<String>,
}

/// Editable buyer fields; the birthday is `YYYY-MM-DD`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuyerProfileUpdate {
    pub gender: String,
    pub birthday: String,
}

/// Vendor-side view of one of its games from `/vendors/query-vendor-games`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorGame {
    pub game_name: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub download_link: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub sales_volume: Option<u64>,
    pub score: Option<f64>,
}

/// Game listing submitted to `/vendors/create-game`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub account: String,
    pub game_name: String,
    pub category: String,
    pub price: f64,
    pub company_name: String,
    pub description: String,
    pub download_link: String,
    pub license_number: String,
}

/// Edit submitted to `/vendors/update-game`; the game is matched by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub account: String,
    pub game_name: String,
    pub price: f64,
    pub description: String,
    pub license_number: String,
    pub download_link: String,
    pub category: String,
}

/// Buyer review from `/vendors/query-game-reviews`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub nickname: Option<String>,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub review_time: Option<String>,
}

/// Per-game sales figures from `/vendors/query-game-sales`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesRecord {
    pub game_name: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub sales_volume: u64,
    pub visitor_count: u64,
    pub sales_amount: f64,
    pub conversion_rate: f64,
    pub status: Option<String>,
}

/// Vendor profile from `/vendors/personal-info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorProfile {
    pub account: Option<String>,
    pub company_name: Option<String>,
    pub registered_address: Option<String>,
    pub contact: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfileUpdate {
    pub contact: String,
    pub registered_address: String,
    pub contact_person: String,
}

/// Listing application from `/vendors/query-applications-by-company`.
///
/// `approval_status` is one of `待审批`, `通过` or `拒绝`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameApplication {
    #[serde(deserialize_with = "string_or_number")]
    pub application_id: String,
    pub game_name: String,
    pub company_name: Option<String>,
    pub approval_status: Option<String>,
    pub approval_result: Option<String>,
    pub application_time: Option<String>,
}

/// Accepts ids the backend sends either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Int(value) => value.to_string(),
    })
}
