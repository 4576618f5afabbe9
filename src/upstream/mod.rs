//! Upstream GraphQL client
//!
//! One fixed endpoint, three fixed query documents, one POST per fetch.
//! The [`Upstream`] trait is the seam the planner core talks through; the
//! production implementation is [`GraphQlClient`].

use crate::config::PlannerConfig;
use crate::model::{MapDetail, RawAmmo, Task};
use crate::{PlannerError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tasks with requirements, rewards and objectives
const TASKS_QUERY: &str = r#"
{
    tasks {
        id
        name
        minPlayerLevel
        map { name }
        trader { name, imageLink }
        neededKeys {
            keys { name, shortName, iconLink }
        }
        startRewards {
            items {
                item { id, name, iconLink },
                count
            }
        }
        objectives {
            description
            type
            ... on TaskObjectiveItem {
                item { id, name, iconLink }
                count
                foundInRaid
            }
            ... on TaskObjectiveMark {
                markerItem { id, name, iconLink }
            }
        }
        taskRequirements {
            task {
                id
                name
            }
        }
    }
}
"#;

/// Map detail by name list
const MAPS_QUERY: &str = r#"
query GetMapData($name: [String!]) {
    maps(name: $name) {
        id
        name
        normalizedName
        coordinateRotation
        players
        enemies
        raidDuration
        extracts {
            id
            name
            faction
            position { x y z }
        }
        spawns {
            zoneName
            position { x y z }
            sides
            categories
        }
        bosses {
            name
            spawnChance
            spawnLocations {
                name
                chance
                position { x y z }
            }
        }
        lootContainers {
            position { x y z }
            lootContainer { name normalizedName }
        }
        hazards {
            name
            hazardType
            position { x y z }
        }
    }
}
"#;

/// Ammunition with market offers
const AMMO_QUERY: &str = r#"
{
    ammo {
        item {
            id
            name
            shortName
            iconLink
            sellFor { priceRUB vendor { name } }
            buyFor { priceRUB vendor { name } }
        }
        caliber
        damage
        penetrationPower
        armorDamage
        fragmentationChance
        tracer
        tracerColor
        projectileCount
        initialSpeed
    }
}
"#;

/// Seam between the planner core and the game-data API
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<Task>>;
    async fn fetch_maps(&self, names: &[String]) -> Result<Vec<MapDetail>>;
    async fn fetch_ammo(&self) -> Result<Vec<RawAmmo>>;
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct TasksData {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

#[derive(Deserialize)]
struct MapsData {
    #[serde(default)]
    maps: Option<Vec<MapDetail>>,
}

#[derive(Deserialize)]
struct AmmoData {
    #[serde(default)]
    ammo: Option<Vec<RawAmmo>>,
}

/// Production GraphQL client
#[derive(Debug)]
pub struct GraphQlClient {
    endpoint: String,
    http: reqwest::Client,
}

impl GraphQlClient {
    /// Build a client from the planner configuration.
    ///
    /// HTTP/2 negotiation is disabled because the upstream service is known
    /// to mishandle it; this is a required compatibility setting.
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .http1_only()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| PlannerError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }

    /// Perform a single query/response exchange and unwrap the envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: Option<Value>,
    ) -> Result<T> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::UpstreamError(format!(
                "upstream returned HTTP {}",
                status
            )));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PlannerError::UpstreamTimeout
            } else {
                PlannerError::UpstreamMalformed(e.to_string())
            }
        })?;

        if let Some(error) = envelope.errors.first() {
            return Err(PlannerError::UpstreamError(error.message.clone()));
        }

        envelope
            .data
            .ok_or_else(|| PlannerError::UpstreamMalformed("response carried no data".to_string()))
    }
}

#[async_trait]
impl Upstream for GraphQlClient {
    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        tracing::debug!("Fetching task data from upstream");
        let data: TasksData = self.execute(TASKS_QUERY, None).await?;
        Ok(data.tasks.unwrap_or_default())
    }

    async fn fetch_maps(&self, names: &[String]) -> Result<Vec<MapDetail>> {
        tracing::debug!(maps = ?names, "Fetching map data from upstream");
        let variables = serde_json::json!({ "name": names });
        let data: MapsData = self.execute(MAPS_QUERY, Some(variables)).await?;
        Ok(data.maps.unwrap_or_default())
    }

    async fn fetch_ammo(&self) -> Result<Vec<RawAmmo>> {
        tracing::debug!("Fetching ammunition data from upstream");
        let data: AmmoData = self.execute(AMMO_QUERY, None).await?;
        Ok(data.ammo.unwrap_or_default())
    }
}
