//! Account model and acting-account context.
//!
//! An account is the tenant that exclusively owns a set of employees and,
//! through them, their salary records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an owning account.
pub type AccountId = Uuid;

/// A registered account (tenant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account.
    pub id: AccountId,
    /// Display name of the account holder.
    pub name: String,
    /// Login email, stored lowercased.
    pub email: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

/// Registration payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Display name of the account holder.
    pub name: String,
    /// Login email.
    pub email: String,
}

impl Account {
    /// Builds a new account from a registration payload.
    pub fn register(input: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            created_at: Utc::now(),
        }
    }
}

/// The acting identity for an operation.
///
/// Resolved by the authentication layer and passed explicitly as the first
/// argument of every service operation. An empty context means the caller
/// is not authenticated.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AccountContext;
/// use uuid::Uuid;
///
/// let id = Uuid::new_v4();
/// assert_eq!(AccountContext::for_account(id).account_id(), Some(id));
/// assert_eq!(AccountContext::anonymous().account_id(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountContext {
    account_id: Option<AccountId>,
}

impl AccountContext {
    /// A context acting on behalf of the given account.
    pub fn for_account(account_id: AccountId) -> Self {
        Self {
            account_id: Some(account_id),
        }
    }

    /// A context with no authenticated account.
    pub fn anonymous() -> Self {
        Self { account_id: None }
    }

    /// Returns the acting account id, if any.
    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }
}
