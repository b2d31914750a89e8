// src/cli/run.rs — One generation run

use std::sync::{Arc, Mutex};

use crate::core::orchestrator::RunOrchestrator;
use crate::core::types::{EngineSettings, RunStatus};
use crate::infra::config::Config;
use crate::infra::paths;
use crate::notify::{EmailNotifier, NoopNotifier, NotificationPort};
use crate::provider::anthropic::{AnthropicClient, AnthropicEvaluator, AnthropicGenerator};
use crate::sources::StoreSeedSource;
use crate::store::Store;

/// Wire the engine from config and execute one run for `slot`. Returns the
/// process exit code: 0 for published, draft, or duplicate skip; 2 for a
/// failed run. Startup errors propagate as `Err` and exit 1 in main.
pub async fn run_once(config: &Config, slot: &str) -> anyhow::Result<i32> {
    let store = Arc::new(Mutex::new(Store::open(&paths::db_path())?));

    let client = AnthropicClient::from_env()?;
    let generator = Arc::new(AnthropicGenerator::new(
        client.clone(),
        config.models.generator.clone(),
    ));
    let evaluator = Arc::new(AnthropicEvaluator::new(
        client,
        config.models.evaluator_model().to_string(),
    ));

    let seed_source = Arc::new(StoreSeedSource::new(
        Arc::clone(&store),
        config.sources.min_items,
        config.sources.max_items,
    ));

    let notifier: Arc<dyn NotificationPort> = if config.email.enabled {
        Arc::new(EmailNotifier::from_config(&config.email)?)
    } else {
        Arc::new(NoopNotifier)
    };

    let orchestrator = RunOrchestrator::new(
        generator,
        evaluator,
        EngineSettings::from(&config.engine),
        seed_source,
        notifier,
        Some(store),
    )?;

    let outcome = orchestrator.run(slot).await?;
    orchestrator.notify_outcome(&outcome).await;

    println!("{}", outcome.summary_line());

    if outcome.is_skip() {
        return Ok(0);
    }
    Ok(match outcome.status {
        RunStatus::Failed => 2,
        _ => 0,
    })
}
