//! Input validation.
//!
//! Each field is checked into a [`Validated`]; independent checks are
//! combined with `map2`/`map3` so every violation is reported at once,
//! joined into a single `Validation` error.
//!
//! # Examples
//!
//! ```rust
//! use reward_tasks::application::validation::{CreateTaskInput, validate_new_task};
//! use reward_tasks::domain::TaskTypeId;
//!
//! let input = CreateTaskInput {
//!     task_type: TaskTypeId::new(1),
//!     name: "Join the channel".to_string(),
//!     description: None,
//!     link: "https://t.me/example".to_string(),
//!     total_clicks: 10,
//!     reward_per_click: 50,
//! };
//!
//! let validated = validate_new_task(input).unwrap();
//! assert_eq!(validated.escrow.value(), 500);
//! ```

use lambars::typeclass::Applicative;
use rust_decimal::Decimal;

use crate::domain::{DomainError, Points, TaskTypeId, Validated, escrow_for, package_points};

/// Maximum length of a task name, in characters.
pub const MAX_TASK_NAME_LENGTH: usize = 255;

/// Maximum length of a task description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Maximum length of a task link, in characters.
pub const MAX_LINK_LENGTH: usize = 2_048;

/// Maximum number of clicks a single task can buy.
pub const MAX_TOTAL_CLICKS: i64 = 1_000_000;

/// Maximum length of a wallet address or transaction hash.
pub const MAX_WALLET_FIELD_LENGTH: usize = 128;

/// Raw task creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskInput {
    /// Requested category.
    pub task_type: TaskTypeId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Target link.
    pub link: String,
    /// Requested number of paid clicks.
    pub total_clicks: i64,
    /// Requested reward per click.
    pub reward_per_click: i64,
}

/// A task creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTask {
    /// Category; existence is checked against storage by the workflow.
    pub task_type: TaskTypeId,
    /// Trimmed display name.
    pub name: String,
    /// Trimmed description, `None` if blank.
    pub description: Option<String>,
    /// Trimmed link.
    pub link: String,
    /// Number of paid clicks.
    pub total_clicks: u32,
    /// Reward per click.
    pub reward_per_click: Points,
    /// `total_clicks × reward_per_click`.
    pub escrow: Points,
}

/// Validates a task creation request.
///
/// Field checks are independent and combined applicatively; the escrow
/// check runs only once both of its inputs passed.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every violated rule.
pub fn validate_new_task(input: CreateTaskInput) -> Result<ValidatedTask, DomainError> {
    let CreateTaskInput {
        task_type,
        name,
        description,
        link,
        total_clicks,
        reward_per_click,
    } = input;

    let text = validated_name(&name).map3(
        validated_description(description),
        validated_link(&link),
        |name, description, link| (name, description, link),
    );
    let pricing = validated_total_clicks(total_clicks)
        .map2(validated_reward_per_click(reward_per_click), |clicks, reward| {
            (clicks, reward)
        })
        .and_then(|(clicks, reward)| validated_escrow(clicks, reward));

    text.map2(
        pricing,
        move |(name, description, link), (total_clicks, reward_per_click, escrow)| ValidatedTask {
            task_type,
            name,
            description,
            link,
            total_clicks,
            reward_per_click,
            escrow,
        },
    )
    .into_domain()
}

/// Trimmed, non-empty name within [`MAX_TASK_NAME_LENGTH`].
#[must_use]
pub fn validated_name(name: &str) -> Validated<String> {
    let name = name.trim();
    if name.is_empty() {
        Validated::invalid("name", "name cannot be empty")
    } else if name.chars().count() > MAX_TASK_NAME_LENGTH {
        Validated::invalid(
            "name",
            format!("name cannot exceed {MAX_TASK_NAME_LENGTH} characters"),
        )
    } else {
        Validated::valid(name.to_string())
    }
}

/// Trimmed description; blank becomes `None`.
#[must_use]
pub fn validated_description(description: Option<String>) -> Validated<Option<String>> {
    match description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
    {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => Validated::invalid(
            "description",
            format!("description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"),
        ),
        description => Validated::valid(description),
    }
}

/// Trimmed absolute `http(s)` URL without whitespace.
#[must_use]
pub fn validated_link(link: &str) -> Validated<String> {
    let link = link.trim();
    if link.is_empty() {
        return Validated::invalid("link", "link cannot be empty");
    }
    if link.chars().count() > MAX_LINK_LENGTH {
        return Validated::invalid(
            "link",
            format!("link cannot exceed {MAX_LINK_LENGTH} characters"),
        );
    }
    let has_scheme = ["https://", "http://"]
        .iter()
        .any(|scheme| link.len() > scheme.len() && link.starts_with(scheme));
    if !has_scheme || link.chars().any(char::is_whitespace) {
        return Validated::invalid("link", "link must be an absolute http(s) URL");
    }
    Validated::valid(link.to_string())
}

/// Click count between 1 and [`MAX_TOTAL_CLICKS`].
#[must_use]
pub fn validated_total_clicks(total_clicks: i64) -> Validated<u32> {
    match u32::try_from(total_clicks) {
        Ok(clicks) if clicks > 0 && total_clicks <= MAX_TOTAL_CLICKS => Validated::valid(clicks),
        _ => Validated::invalid(
            "total_clicks",
            format!("total_clicks must be between 1 and {MAX_TOTAL_CLICKS}"),
        ),
    }
}

/// Strictly positive reward.
#[must_use]
pub fn validated_reward_per_click(reward_per_click: i64) -> Validated<Points> {
    match Points::new(reward_per_click) {
        Ok(reward) if !reward.is_zero() => Validated::valid(reward),
        _ => Validated::invalid(
            "reward_per_click",
            "reward_per_click must be greater than zero",
        ),
    }
}

fn validated_escrow(total_clicks: u32, reward_per_click: Points) -> Validated<(u32, Points, Points)> {
    escrow_for(total_clicks, reward_per_click).map_or_else(
        || Validated::invalid("total_clicks", "total_clicks × reward_per_click is too large"),
        |escrow| Validated::valid((total_clicks, reward_per_click, escrow)),
    )
}

/// A deposit request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDeposit {
    /// Trimmed wallet address.
    pub wallet_address: String,
    /// Package price.
    pub amount: Decimal,
    /// Points the package buys.
    pub points: Points,
}

/// Validates a deposit request.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every violated rule.
pub fn validate_deposit(wallet_address: &str, amount: Decimal) -> Result<ValidatedDeposit, DomainError> {
    validated_wallet_field("wallet_address", wallet_address)
        .map2(validated_package(amount), move |wallet_address, points| {
            ValidatedDeposit {
                wallet_address,
                amount,
                points,
            }
        })
        .into_domain()
}

/// Points bought by `amount`, if it is a deposit package.
#[must_use]
pub fn validated_package(amount: Decimal) -> Validated<Points> {
    package_points(amount).map_or_else(
        || Validated::invalid("amount", format!("{amount} is not a deposit package")),
        Validated::valid,
    )
}

/// Validates an optional transaction hash supplied at settlement.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the hash is blank or too long.
pub fn validate_transaction_hash(hash: Option<String>) -> Result<Option<String>, DomainError> {
    hash.map(|hash| validated_wallet_field("transaction_hash", &hash).into_domain())
        .transpose()
}

fn validated_wallet_field(field: &'static str, value: &str) -> Validated<String> {
    let value = value.trim();
    if value.is_empty() {
        Validated::invalid(field, format!("{field} cannot be empty"))
    } else if value.len() > MAX_WALLET_FIELD_LENGTH {
        Validated::invalid(
            field,
            format!("{field} cannot exceed {MAX_WALLET_FIELD_LENGTH} characters"),
        )
    } else {
        Validated::valid(value.to_string())
    }
}
