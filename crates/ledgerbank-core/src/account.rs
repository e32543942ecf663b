//! Account types for LedgerBank.
//!
//! Each user owns exactly one account. The account carries the spendable balance
//! in cents plus a human-facing account number.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Default prefix for generated account numbers.
pub const DEFAULT_ACCOUNT_NUMBER_PREFIX: &str = "ACC";

/// A bank account owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The owning user. One account per user.
    pub user_id: UserId,

    /// Human-facing account number, see [`generate_account_number`].
    pub account_number: String,

    /// Kind of account.
    pub account_type: AccountType,

    /// Current balance in cents.
    pub balance_cents: i64,

    /// Account status. Stored for display, not checked by balance mutations.
    pub status: AccountStatus,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new active account with zero balance.
    #[must_use]
    pub fn new(user_id: UserId, account_number: String, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            account_number,
            account_type,
            balance_cents: 0,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with a freshly generated account number.
    #[must_use]
    pub fn open(user_id: UserId, prefix: &str, account_type: AccountType) -> Self {
        Self::new(user_id, generate_account_number(prefix), account_type)
    }

    /// Check if the account can cover a debit of `amount_cents`.
    #[must_use]
    pub fn has_sufficient_balance(&self, amount_cents: i64) -> bool {
        self.balance_cents >= amount_cents
    }
}

/// Generate an account number: prefix, unix milliseconds, then a 3-digit random suffix.
///
/// Numbers are not guaranteed to be globally unique; two accounts opened in the same
/// millisecond collide with probability 1/1000.
#[must_use]
pub fn generate_account_number(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().as_u128() % 1000;
    format!("{prefix}{millis}{suffix:03}")
}

/// Kind of bank account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Savings account (default for lazily provisioned accounts).
    #[default]
    Savings,

    /// Current (checking) account.
    Current,
}

impl AccountType {
    /// Wire name of the account type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Current => "current",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" => Ok(Self::Savings),
            "current" => Ok(Self::Current),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// Status of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is open.
    #[default]
    Active,

    /// Account is dormant.
    Inactive,

    /// Account is frozen by the bank.
    Frozen,
}

impl AccountStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Frozen => "frozen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_is_active_with_zero_balance() {
        let account = Account::open(UserId::generate(), "ACC", AccountType::default());
        assert_eq!(account.balance_cents, 0);
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.account_type, AccountType::Savings);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn sufficient_balance_is_inclusive() {
        let mut account = Account::open(UserId::generate(), "ACC", AccountType::Savings);
        account.balance_cents = 10_000;

        assert!(account.has_sufficient_balance(5_000));
        assert!(account.has_sufficient_balance(10_000));
        assert!(!account.has_sufficient_balance(10_001));
    }

    #[test]
    fn account_number_layout() {
        let number = generate_account_number("ACC");
        assert!(number.starts_with("ACC"));

        let digits = &number[3..];
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        // 13-digit millisecond timestamp plus a 3-digit suffix.
        assert_eq!(digits.len(), 16);
    }

    #[test]
    fn account_number_uses_custom_prefix() {
        assert!(generate_account_number("LB-").starts_with("LB-"));
    }

    #[test]
    fn account_type_parsing() {
        assert_eq!("savings".parse::<AccountType>(), Ok(AccountType::Savings));
        assert_eq!(" Current ".parse::<AccountType>(), Ok(AccountType::Current));
        assert!("fixed".parse::<AccountType>().is_err());
    }

    #[test]
    fn account_serializes_snake_case_enums() {
        let account = Account::open(UserId::generate(), "ACC", AccountType::Current);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["account_type"], "current");
        assert_eq!(json["status"], "active");
    }
}
