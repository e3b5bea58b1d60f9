use sea_orm::{EntityTrait, PaginatorTrait};
use tracing::{Level, info};

use recorder::config::AppConfig;
use recorder::database::{ensure_indexes, init_db};
use recorder::entity::{country, port, registration_history, sighting, vessel, voyage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let level: Level = config.logging.level.parse()?;
    tracing_subscriber::fmt().with_max_level(level).init();

    let db = init_db(&config.database).await?;
    ensure_indexes(&db).await?;
    info!("Schema synchronized");

    let countries = country::Entity::find().count(&db).await?;
    let ports = port::Entity::find().count(&db).await?;
    let vessels = vessel::Entity::find().count(&db).await?;
    let registrations = registration_history::Entity::find().count(&db).await?;
    let voyages = voyage::Entity::find().count(&db).await?;
    let sightings = sighting::Entity::find().count(&db).await?;
    info!(
        countries,
        ports, vessels, registrations, voyages, sightings, "Recorder database ready"
    );

    Ok(())
}
