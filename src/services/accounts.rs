//! Account registration and acting-account resolution.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Account, AccountContext, AccountId, NewAccount};
use crate::repository::AccountRepository;
use crate::validation::validate_new_account;

/// Registers accounts and resolves the acting account of a request.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    /// Creates the service over an account repository.
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Registers a new account.
    ///
    /// The email is stored lowercased and must be unique across accounts.
    pub async fn register(&self, input: NewAccount) -> PayrollResult<Account> {
        validate_new_account(&input)?;
        let account = Account::register(input);

        if self.accounts.find_by_email(&account.email).await?.is_some() {
            warn!(email = %account.email, "Account registration rejected: email taken");
            return Err(PayrollError::conflict(
                "An account with this email already exists",
            ));
        }
        self.accounts.insert(&account).await?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Resolves the acting account of `ctx`.
    ///
    /// Fails with `Unauthorized` when the context is anonymous or names an
    /// account that does not exist.
    pub async fn resolve(&self, ctx: &AccountContext) -> PayrollResult<Account> {
        let Some(account_id) = ctx.account_id() else {
            warn!("Request without an acting account");
            return Err(PayrollError::Unauthorized);
        };
        match self.accounts.find_by_id(account_id).await? {
            Some(account) => Ok(account),
            None => {
                warn!(%account_id, "Request for unknown account");
                Err(PayrollError::Unauthorized)
            }
        }
    }

    /// Resolves the acting account and returns only its id.
    pub async fn resolve_id(&self, ctx: &AccountContext) -> PayrollResult<AccountId> {
        self.resolve(ctx).await.map(|account| account.id)
    }
}
