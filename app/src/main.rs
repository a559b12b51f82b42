//! FitCoin entry point: wires the simulated stack and runs a short session
//! where the screens would sit, consuming only the store's read API and the
//! named transactions.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fitcoin_app::domain::ports::RegistrationDraft;
use fitcoin_app::domain::{
    ActivityTracker, Error, ErrorCode, FitnessGoal, SessionService, TrackerConfig,
};
use fitcoin_app::outbound::{FileSessionStateRepository, SimulatedChain, SimulatedChainConfig};

fn demo_registration() -> Result<RegistrationDraft, Error> {
    let date_of_birth = NaiveDate::from_ymd_opt(1992, 6, 14)
        .ok_or_else(|| Error::internal("invalid demo date of birth"))?;
    Ok(RegistrationDraft {
        username: "demo_mover".to_owned(),
        full_name: "Demo Mover".to_owned(),
        date_of_birth,
        height_cm: 175,
        weight_kg: 70,
        fitness_goal: FitnessGoal::GeneralFitness,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let data_dir = env::var("FITCOIN_DATA_DIR").unwrap_or_else(|_| "fitcoin-data".into());
    let repo = FileSessionStateRepository::open(&data_dir)
        .map_err(|err| Error::internal(format!("open session storage: {err}")))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let chain = SimulatedChain::new(
        SimulatedChainConfig {
            latency: Duration::from_millis(400),
        },
        Arc::clone(&clock),
    );

    let service = SessionService::new(
        Arc::new(repo),
        Arc::new(chain),
        clock,
        ActivityTracker::with_defaults(TrackerConfig::default()),
    );

    if service.restore().await? {
        info!("restored persisted session");
    } else {
        info!("no persisted identity; registering a demo profile");
        service.register(demo_registration()?).await?;
    }
    let snapshot = service.snapshot();
    if let Some(user) = &snapshot.user {
        info!(
            user = %user.username(),
            wallet = %user.wallet_address().abbreviated(),
            balance = snapshot.coins.balance(),
            "session ready"
        );
    }

    service.start_tracking()?;
    tokio::time::sleep(Duration::from_secs(6)).await;
    if let Some(progress) = service.tracking_progress() {
        info!(
            elapsed_seconds = progress.elapsed_seconds,
            calories_burned = progress.calories_burned,
            coins_earning = progress.coins_earning,
            "tracking in progress"
        );
    }

    match service.stop_tracking().await? {
        Some(record) => info!(
            duration_minutes = record.duration_minutes(),
            calories_burned = record.calories_burned(),
            coins_earned = record.coins_earned(),
            "activity recorded"
        ),
        None => info!("no calories accrued; nothing recorded"),
    }

    let balance = service.snapshot().coins.balance();
    let affordable = fitcoin_app::catalog::catalog()
        .iter()
        .filter(|item| item.available && item.coin_cost <= balance)
        .min_by_key(|item| item.coin_cost);
    match affordable {
        Some(item) => match service.purchase(item).await {
            Ok(ledger) => info!(
                item = %item.title,
                balance = ledger.balance(),
                "purchase settled"
            ),
            Err(err) if err.code() == ErrorCode::InsufficientFunds => {
                info!(item = %item.title, "not enough coins yet")
            }
            Err(err) => return Err(err),
        },
        None => info!(balance, "keep moving to afford the first offer"),
    }

    let today = service.today_summary();
    let lifetime = service.lifetime_stats();
    info!(
        activities = today.activities,
        calories_burned = today.calories_burned,
        coins_earned = today.coins_earned,
        "today's totals"
    );
    info!(
        total_activities = lifetime.total_activities,
        total_calories = lifetime.total_calories,
        average_calories = lifetime.average_calories,
        "lifetime totals"
    );

    Ok(())
}
