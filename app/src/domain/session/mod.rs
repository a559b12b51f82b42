//! Session domain service.
//!
//! The service is the single writer over the session snapshot. Screens read
//! clones of the snapshot and invoke the transactions below; no screen
//! performs ledger arithmetic itself. Every transaction either commits the
//! ledger change and the matching history change together or leaves both
//! untouched, so `balance == total_earned - total_spent` and the history
//! stay mutually consistent through any failure.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate};
use fitcoin_catalog::MarketplaceItem;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    ChainService, ChainServiceError, PersistedSession, RegistrationDraft, SessionStateRepository,
    SessionStoreError,
};
use crate::domain::{
    ActivityRecord, ActivityRecordDraft, ActivitySample, ActivityTracker, ActivityType,
    CoinLedger, Error, ErrorCode, SessionResult, TrackerProgress, User, Username,
};


fn map_chain_error(error: ChainServiceError) -> Error {
    Error::remote_operation_failed(format!("chain call failed: {error}"))
}

fn map_store_error(error: SessionStoreError) -> Error {
    Error::internal(format!("session storage error: {error}"))
}

fn no_session_error() -> Error {
    Error::invalid_request("no active session; register or log in first")
}

/// Point-in-time clone of the session state consumed by screens.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The logged-in identity, if any.
    pub user: Option<User>,
    /// Current coin ledger.
    pub coins: CoinLedger,
    /// Finalized activities in chronological (append) order.
    pub activities: Vec<ActivityRecord>,
    /// Whether a wallet/session is connected.
    pub connected: bool,
    /// Whether an activity is currently being tracked.
    pub tracking: bool,
}

/// Aggregates over the current local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodaySummary {
    /// The local date the summary covers.
    pub date: NaiveDate,
    /// Activities finalized today.
    pub activities: usize,
    /// Calories burned today.
    pub calories_burned: u64,
    /// Coins earned today.
    pub coins_earned: u64,
}

/// Lifetime aggregates for the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeStats {
    /// Total finalized activities.
    pub total_activities: usize,
    /// Total calories burned.
    pub total_calories: u64,
    /// Total coins earned from activities.
    pub total_coins_earned: u64,
    /// `total_calories / max(total_activities, 1)`.
    pub average_calories: u64,
}

/// A profile achievement with its earned flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    /// Achievement title.
    pub name: &'static str,
    /// What it takes to earn it.
    pub description: &'static str,
    /// Whether the session has earned it.
    pub earned: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    coins: CoinLedger,
    activities: Vec<ActivityRecord>,
    connected: bool,
    pending_sample: Option<ActivitySample>,
}

/// Driving service owning the authoritative session snapshot.
///
/// Generic over the session-state repository `R` and the chain service `C`
/// so tests inject deterministic doubles for both collaborators.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use fitcoin_app::domain::ports::{FixtureChainService, FixtureSessionStateRepository};
/// use fitcoin_app::domain::{ActivityTracker, SessionService, TrackerConfig};
///
/// # async fn example() -> Result<(), fitcoin_app::domain::Error> {
/// let service = SessionService::new(
///     Arc::new(FixtureSessionStateRepository),
///     Arc::new(FixtureChainService),
///     Arc::new(mockable::DefaultClock),
///     ActivityTracker::with_defaults(TrackerConfig::default()),
/// );
/// let restored = service.restore().await?;
/// assert!(!restored);
/// # Ok(())
/// # }
/// ```
pub struct SessionService<R, C> {
    state: Mutex<SessionState>,
    repo: Arc<R>,
    chain: Arc<C>,
    clock: Arc<dyn Clock>,
    tracker: ActivityTracker,
}

impl<R, C> SessionService<R, C> {
    /// Create a session service over the injected collaborators.
    pub fn new(repo: Arc<R>, chain: Arc<C>, clock: Arc<dyn Clock>, tracker: ActivityTracker) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            repo,
            chain,
            clock,
            tracker,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        // State is only ever replaced with fully computed snapshots, so a
        // poisoned lock still holds a coherent one.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn install(&self, persisted: PersistedSession) {
        let mut state = self.lock_state();
        state.user = Some(persisted.user);
        state.coins = persisted.coins;
        state.activities = persisted.activities;
        state.connected = true;
    }

    fn clear_pending(&self) {
        self.lock_state().pending_sample = None;
    }

    fn current_user(&self) -> SessionResult<User> {
        self.lock_state().user.clone().ok_or_else(no_session_error)
    }

    /// Point-in-time clone of the full session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            user: state.user.clone(),
            coins: state.coins,
            activities: state.activities.clone(),
            connected: state.connected,
            tracking: self.tracker.is_tracking(),
        }
    }

    /// Live tracker accumulator for the dashboard, `None` while idle.
    pub fn tracking_progress(&self) -> Option<TrackerProgress> {
        self.tracker.progress()
    }

    /// Whether a finished activity is awaiting a retried confirmation.
    pub fn pending_commit(&self) -> bool {
        self.lock_state().pending_sample.is_some()
    }

    /// Aggregates over activities finalized on the current local calendar
    /// day (local date equality, not a rolling 24 h window).
    pub fn today_summary(&self) -> TodaySummary {
        let today = self.clock.local().date_naive();
        let state = self.lock_state();
        let mut summary = TodaySummary {
            date: today,
            activities: 0,
            calories_burned: 0,
            coins_earned: 0,
        };
        for record in state
            .activities
            .iter()
            .filter(|record| record.recorded_at().with_timezone(&Local).date_naive() == today)
        {
            summary.activities += 1;
            summary.calories_burned += u64::from(record.calories_burned());
            summary.coins_earned += record.coins_earned();
        }
        summary
    }

    /// Lifetime aggregates across the whole history.
    pub fn lifetime_stats(&self) -> LifetimeStats {
        let state = self.lock_state();
        let total_activities = state.activities.len();
        let total_calories: u64 = state
            .activities
            .iter()
            .map(|record| u64::from(record.calories_burned()))
            .sum();
        let total_coins_earned: u64 = state
            .activities
            .iter()
            .map(ActivityRecord::coins_earned)
            .sum();
        LifetimeStats {
            total_activities,
            total_calories,
            total_coins_earned,
            average_calories: total_calories / (total_activities.max(1) as u64),
        }
    }

    /// Profile achievements with their earned flags.
    pub fn achievements(&self) -> Vec<Achievement> {
        let (total_activities, total_calories, total_earned) = {
            let state = self.lock_state();
            let calories: u64 = state
                .activities
                .iter()
                .map(|record| u64::from(record.calories_burned()))
                .sum();
            (state.activities.len(), calories, state.coins.total_earned())
        };
        vec![
            Achievement {
                name: "First Steps",
                description: "Complete your first activity",
                earned: total_activities > 0,
            },
            Achievement {
                name: "Coin Collector",
                description: "Earn 100 FitCoins",
                earned: total_earned >= 100,
            },
            Achievement {
                name: "Calorie Crusher",
                description: "Burn 1000 calories",
                earned: total_calories >= 1000,
            },
            Achievement {
                name: "Consistency King",
                description: "Complete 10 activities",
                earned: total_activities >= 10,
            },
        ]
    }
}

impl<R, C> SessionService<R, C>
where
    R: SessionStateRepository,
    C: ChainService,
{
    /// Register a fresh identity through the chain and install the new
    /// snapshot (new user, zero ledger, empty history).
    pub async fn register(&self, draft: RegistrationDraft) -> SessionResult<User> {
        Username::new(draft.username.as_str())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if draft.full_name.trim().is_empty() {
            return Err(Error::invalid_request("full name must not be empty"));
        }

        let user = self
            .chain
            .register_user(draft)
            .await
            .map_err(map_chain_error)?;

        let persisted = PersistedSession {
            user: user.clone(),
            coins: CoinLedger::default(),
            activities: Vec::new(),
        };
        self.repo.save(&persisted).await.map_err(map_store_error)?;
        self.clear_pending();
        self.install(persisted);
        Ok(user)
    }

    /// Install the persisted snapshot; [`ErrorCode::NotRegistered`] when no
    /// identity is stored on this device.
    pub async fn login(&self) -> SessionResult<User> {
        let Some(persisted) = self.repo.load().await.map_err(map_store_error)? else {
            return Err(Error::not_registered(
                "no persisted identity on this device",
            ));
        };
        let user = persisted.user.clone();
        self.clear_pending();
        self.install(persisted);
        Ok(user)
    }

    /// Startup rehydration: like [`SessionService::login`], but a missing
    /// identity is `Ok(false)` rather than an error.
    pub async fn restore(&self) -> SessionResult<bool> {
        match self.login().await {
            Ok(_) => Ok(true),
            Err(err) if err.code() == ErrorCode::NotRegistered => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Clear the in-memory and persisted snapshot. Idempotent.
    pub async fn logout(&self) -> SessionResult<()> {
        // A logout discards any in-flight accrual.
        let _ = self.tracker.stop();
        self.repo.clear().await.map_err(map_store_error)?;
        *self.lock_state() = SessionState::default();
        Ok(())
    }

    /// Begin tracking an activity.
    pub fn start_tracking(&self) -> SessionResult<()> {
        {
            let state = self.lock_state();
            if state.user.is_none() {
                return Err(no_session_error());
            }
            if state.pending_sample.is_some() {
                return Err(Error::invalid_request(
                    "a finished activity is awaiting confirmation; retry stop first",
                ));
            }
        }
        self.tracker
            .start()
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Stop tracking and finalize the accrued activity.
    ///
    /// Returns `Ok(None)` when nothing accrued (no record, no remote call).
    /// On a remote or persistence failure nothing commits and the sample is
    /// retained; calling this again retries finalisation of the same sample.
    pub async fn stop_tracking(&self) -> SessionResult<Option<ActivityRecord>> {
        let Some(sample) = self.take_finalizable_sample()? else {
            return Ok(None);
        };

        // Park the sample before the first await: a caller abandoning this
        // future mid-flight must still be able to retry the commit.
        self.lock_state().pending_sample = Some(sample);
        let record = self.finalize(sample).await?;
        Ok(Some(record))
    }

    /// Record a marketplace spend.
    ///
    /// Fails with [`ErrorCode::InsufficientFunds`] when the balance cannot
    /// cover the item; the catalogue effect itself is external.
    pub async fn purchase(&self, item: &MarketplaceItem) -> SessionResult<CoinLedger> {
        let (user, persisted) = {
            let state = self.lock_state();
            let user = state.user.clone().ok_or_else(no_session_error)?;
            if !item.available {
                return Err(Error::invalid_request(format!(
                    "{} is not currently available",
                    item.title
                )));
            }
            let coins = state
                .coins
                .debit(item.coin_cost)
                .map_err(|err| Error::insufficient_funds(err.to_string()))?;
            let persisted = PersistedSession {
                user: user.clone(),
                coins,
                activities: state.activities.clone(),
            };
            (user, persisted)
        };

        let settled = self
            .chain
            .spend_coins(user.id(), item.coin_cost)
            .await
            .map_err(map_chain_error)?;
        if !settled {
            return Err(Error::remote_operation_failed(
                "chain declined to settle the spend",
            ));
        }

        self.repo.save(&persisted).await.map_err(map_store_error)?;
        let coins = persisted.coins;
        self.install(persisted);
        Ok(coins)
    }

    fn take_finalizable_sample(&self) -> SessionResult<Option<ActivitySample>> {
        if self.tracker.is_tracking() {
            let sample = self
                .tracker
                .stop()
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            return Ok(sample.has_burn().then_some(sample));
        }
        let mut state = self.lock_state();
        state
            .pending_sample
            .take()
            .map(Some)
            .ok_or_else(|| Error::invalid_request("no activity is being tracked"))
    }

    async fn finalize(&self, sample: ActivitySample) -> SessionResult<ActivityRecord> {
        let user = self.current_user()?;

        let coins_earned = self
            .chain
            .earn_coins(user.id(), sample.calories_burned())
            .await
            .map_err(map_chain_error)?;

        let record = ActivityRecord::new(ActivityRecordDraft {
            id: Uuid::new_v4(),
            user_id: user.id().clone(),
            activity_type: ActivityType::Workout,
            duration_minutes: sample.duration_minutes(),
            calories_burned: sample.whole_calories(),
            coins_earned,
            recorded_at: self.clock.utc(),
        })
        .map_err(|err| {
            Error::internal(format!("chain grant violates the conversion policy: {err}"))
        })?;

        let verified = self
            .chain
            .verify_activity(&record)
            .await
            .map_err(map_chain_error)?;
        if !verified {
            return Err(Error::remote_operation_failed(
                "chain declined to verify the activity",
            ));
        }

        let persisted = {
            let state = self.lock_state();
            let mut activities = state.activities.clone();
            activities.push(record.clone());
            PersistedSession {
                user,
                coins: state.coins.credit(coins_earned),
                activities,
            }
        };
        self.repo.save(&persisted).await.map_err(map_store_error)?;
        self.clear_pending();
        self.install(persisted);
        Ok(record)
    }
}
