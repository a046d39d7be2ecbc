use serde::Serialize;

use crate::{
    query::{required, with_query},
    ApiClient, BuyerRegistration, ClientError, PersonalInfo, PersonalInfoUpdate, Result, User,
    VendorRegistration,
};

#[derive(Serialize)]
struct LoginRequest<'a> {
    account: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyerRegisterRequest {
    role: &'static str,
    account: String,
    password: String,
    contact: String,
    nickname: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorRegisterRequest {
    role: &'static str,
    account: String,
    password: String,
    contact: String,
    company_name: String,
    registered_address: String,
    contact_person: String,
}

/// Login, registration and profile calls under `/users`.
#[derive(Clone, Debug)]
pub struct AccountService {
    client: ApiClient,
}

impl AccountService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns `None` when the backend rejects the credentials (401).
    pub async fn login(&self, account: &str, password: &str) -> Result<Option<User>> {
        let account = required("account", account)?;
        let password = required("password", password)?;
        let request = LoginRequest {
            account: &account,
            password: &password,
        };

        match self.client.post::<User, _>("/users/login", &request).await {
            Ok(user) => Ok(Some(user)),
            Err(err) if err.is_status(401) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Returns `false` when the account, contact or nickname is taken (409).
    pub async fn register_buyer(&self, form: &BuyerRegistration) -> Result<bool> {
        let request = BuyerRegisterRequest {
            role: "buyer",
            account: required("account", &form.account)?,
            password: required("password", &form.password)?,
            contact: required("contact", &form.contact)?,
            nickname: required("nickname", &form.nickname)?,
        };
        conflict_as_false(
            self.client
                .post_unit("/users/register/buyer", &request)
                .await,
        )
    }

    /// Returns `false` when the account, contact or company is taken (409).
    pub async fn register_vendor(&self, form: &VendorRegistration) -> Result<bool> {
        let request = VendorRegisterRequest {
            role: "vendor",
            account: required("account", &form.account)?,
            password: required("password", &form.password)?,
            contact: required("contact", &form.contact)?,
            company_name: required("company name", &form.company_name)?,
            registered_address: required("registered address", &form.registered_address)?,
            contact_person: required("contact person", &form.contact_person)?,
        };
        conflict_as_false(
            self.client
                .post_unit("/users/register/vendor", &request)
                .await,
        )
    }

    /// Returns `None` for an unknown account (404).
    pub async fn personal_info(&self, account: &str) -> Result<Option<PersonalInfo>> {
        let account = required("account", account)?;
        let path = with_query("/users/personal-info", &[("account", account.as_str())]);
        match self.client.get::<PersonalInfo>(&path).await {
            Ok(info) => Ok(Some(info)),
            Err(err) if err.is_status(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Returns `false` for an unknown account (404).
    pub async fn update_personal_info(
        &self,
        account: &str,
        update: &PersonalInfoUpdate,
    ) -> Result<bool> {
        let account = required("account", account)?;
        if update.is_empty() {
            return Err(ClientError::invalid_input("personal info must not be empty"));
        }
        let path = with_query("/users/personal-info", &[("account", account.as_str())]);
        match self.client.put_unit(&path, update).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_status(404) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn conflict_as_false(result: Result<()>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_status(409) => Ok(false),
        Err(err) => Err(err),
    }
}
