//! Cucumber suite for the storefront.
//!
//! Runs `tests/features` against the backend selected by `E2E_BACKEND`
//! (the in-memory storefront by default). Every scenario closes its page
//! afterwards; a failed one leaves `target/screenshots/<scenario>.png`.

#[path = "common/mod.rs"]
mod common;
#[path = "bdd/steps/mod.rs"]
mod steps;
#[path = "bdd/world.rs"]
mod world;

use std::path::PathBuf;

use cucumber::World as _;
use cucumber::event::ScenarioFinished;

use crate::world::StorefrontWorld;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    common::init_logging();

    let features = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features");

    StorefrontWorld::cucumber()
        .max_concurrent_scenarios(4)
        .after(|_feature, _rule, scenario, finished, world| {
            Box::pin(async move {
                let failed = matches!(
                    finished,
                    ScenarioFinished::StepFailed(..) | ScenarioFinished::BeforeHookFailed(_)
                );
                if let Some(world) = world {
                    world.finish(&scenario.name, failed).await;
                }
            })
        })
        .fail_on_skipped()
        .run_and_exit(features)
        .await;
}
