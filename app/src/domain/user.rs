//! User identity model.
//!
//! Identities are wallet-derived: the stable id is the synthesized wallet
//! address, private fields (date of birth) stay on the device, and new users
//! start unverified until the chain flips the flag.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    EmptyWalletAddress,
    WalletAddressMissingPrefix,
    WalletAddressInvalidHex,
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyFullName,
    HeightOutOfRange { min: u32, max: u32 },
    WeightOutOfRange { min: u32, max: u32 },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::EmptyWalletAddress => write!(f, "wallet address must not be empty"),
            Self::WalletAddressMissingPrefix => {
                write!(f, "wallet address must start with 0x")
            }
            Self::WalletAddressInvalidHex => {
                write!(f, "wallet address must be hex digits after the 0x prefix")
            }
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores",
            ),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::HeightOutOfRange { min, max } => {
                write!(f, "height must be between {min} and {max} cm")
            }
            Self::WeightOutOfRange { min, max } => {
                write!(f, "weight must be between {min} and {max} kg")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier; equals the user's wallet address string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.trim().is_empty() || id.trim() != id {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A `0x`-prefixed hex wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate and construct a [`WalletAddress`] from owned input.
    pub fn new(address: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(address.into())
    }

    fn from_owned(address: String) -> Result<Self, UserValidationError> {
        if address.trim().is_empty() {
            return Err(UserValidationError::EmptyWalletAddress);
        }
        let Some(digits) = address.strip_prefix("0x") else {
            return Err(UserValidationError::WalletAddressMissingPrefix);
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UserValidationError::WalletAddressInvalidHex);
        }
        Ok(Self(address))
    }

    /// Short `0xabcd…ef12` form for display chrome.
    pub fn abbreviated(&self) -> String {
        let raw = self.0.as_str();
        if raw.len() <= 10 {
            return raw.to_owned();
        }
        let head: String = raw.chars().take(6).collect();
        let tail: String = raw.chars().skip(raw.chars().count() - 4).collect();
        format!("{head}…{tail}")
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 24;

const HEIGHT_RANGE_CM: (u32, u32) = (50, 280);
const WEIGHT_RANGE_KG: (u32, u32) = (20, 400);

/// Public handle shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from owned input.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Fitness goal chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Endurance,
    GeneralFitness,
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightLoss => f.write_str("weight-loss"),
            Self::MuscleGain => f.write_str("muscle-gain"),
            Self::Endurance => f.write_str("endurance"),
            Self::GeneralFitness => f.write_str("general-fitness"),
        }
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` and `wallet_address` are non-empty; the id equals the address.
/// - `username` satisfies the handle charset and length rules.
/// - Immutable after registration except [`User::mark_verified`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserDraft", into = "UserDraft")]
pub struct User {
    id: UserId,
    wallet_address: WalletAddress,
    username: Username,
    full_name: String,
    date_of_birth: NaiveDate,
    height_cm: u32,
    weight_kg: u32,
    fitness_goal: FitnessGoal,
    is_verified: bool,
    created_at: DateTime<Utc>,
}

/// Input payload for [`User::new`]; also the serde wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub id: String,
    pub wallet_address: String,
    pub username: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub fitness_goal: FitnessGoal,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a validated user.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// # let draft = sample_user_draft();
    /// let user = fitcoin_app::domain::User::new(draft)?;
    /// assert!(!user.is_verified());
    /// Ok::<(), fitcoin_app::domain::UserValidationError>(())
    /// ```
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        Self::try_from(draft)
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Wallet address the identity was derived from.
    pub fn wallet_address(&self) -> &WalletAddress {
        &self.wallet_address
    }

    /// Public handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Full display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Date of birth; retained on the device only.
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Height in centimetres.
    pub fn height_cm(&self) -> u32 {
        self.height_cm
    }

    /// Weight in kilograms.
    pub fn weight_kg(&self) -> u32 {
        self.weight_kg
    }

    /// Fitness goal chosen at registration.
    pub fn fitness_goal(&self) -> FitnessGoal {
        self.fitness_goal
    }

    /// Whether the chain has verified this identity.
    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Flips the verification flag; the only post-registration mutation.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
    }
}

impl TryFrom<UserDraft> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDraft) -> Result<Self, Self::Error> {
        let id = UserId::new(value.id)?;
        let wallet_address = WalletAddress::new(value.wallet_address)?;
        let username = Username::new(value.username)?;

        if value.full_name.trim().is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        let (min, max) = HEIGHT_RANGE_CM;
        if value.height_cm < min || value.height_cm > max {
            return Err(UserValidationError::HeightOutOfRange { min, max });
        }
        let (min, max) = WEIGHT_RANGE_KG;
        if value.weight_kg < min || value.weight_kg > max {
            return Err(UserValidationError::WeightOutOfRange { min, max });
        }

        Ok(Self {
            id,
            wallet_address,
            username,
            full_name: value.full_name,
            date_of_birth: value.date_of_birth,
            height_cm: value.height_cm,
            weight_kg: value.weight_kg,
            fitness_goal: value.fitness_goal,
            is_verified: value.is_verified,
            created_at: value.created_at,
        })
    }
}

impl From<User> for UserDraft {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into(),
            wallet_address: value.wallet_address.into(),
            username: value.username.into(),
            full_name: value.full_name,
            date_of_birth: value.date_of_birth,
            height_cm: value.height_cm,
            weight_kg: value.weight_kg,
            fitness_goal: value.fitness_goal,
            is_verified: value.is_verified,
            created_at: value.created_at,
        }
    }
}
