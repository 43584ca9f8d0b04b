//! Simulator configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use actions_core::{LocationId, Target};

/// Location type used when a scripted action names none.
const DEFAULT_LOCATION_TYPE: &str = "Square";

/// One scripted invocation, written as `Name@LocationType`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedAction {
    pub name: String,
    pub location_type: String,
}

impl PlannedAction {
    pub fn parse(entry: &str) -> Option<Self> {
        let (name, location_type) = match entry.split_once('@') {
            Some((name, location_type)) => (name.trim(), location_type.trim()),
            None => (entry.trim(), DEFAULT_LOCATION_TYPE),
        };
        if name.is_empty() || location_type.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            location_type: location_type.to_owned(),
        })
    }

    /// Parses a comma-separated script, skipping blank or malformed entries.
    pub fn parse_script(script: &str) -> Vec<Self> {
        script.split(',').filter_map(Self::parse).collect()
    }

    /// Location for the `index`-th scripted entry. Ids start at 1 and
    /// saturate at `u32::MAX`.
    pub fn target(&self, index: usize) -> Target {
        let id = u32::try_from(index).map_or(u32::MAX, |index| index.saturating_add(1));
        Target::location(LocationId(id), self.location_type.clone())
    }
}

/// Configuration for a simulator run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub actions_path: Option<PathBuf>,
    pub engine_config_path: Option<PathBuf>,
    pub hours: u64,
    pub money: i64,
    pub influence: i64,
    /// Progression-rate attribute given to every simulated character.
    pub rate: f32,
    pub members: u32,
    pub script: Vec<PlannedAction>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            actions_path: None,
            engine_config_path: None,
            hours: 8,
            money: 200,
            influence: 30,
            rate: 0.0,
            members: 2,
            script: PlannedAction::parse_script("Bribe@Palace,Study@Library,Collect Dues@Market"),
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ACTIONS_DATA` - RON file or directory of action definitions (default: builtin set)
    /// - `ACTIONS_CONFIG` - TOML engine configuration (default: unseeded, no timeout)
    /// - `SIM_HOURS` - Hours to advance after invoking (default: 8)
    /// - `SIM_ACTIONS` - Comma-separated `Name@LocationType` entries
    /// - `SIM_MONEY` / `SIM_INFLUENCE` - Starting resources (default: 200 / 30)
    /// - `SIM_RATE` - Progression rate of every character (default: 0)
    /// - `SIM_MEMBERS` - Organization members available for selection (default: 2)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.actions_path = env::var("ACTIONS_DATA").ok().map(PathBuf::from);
        config.engine_config_path = env::var("ACTIONS_CONFIG").ok().map(PathBuf::from);

        if let Some(hours) = read_env::<u64>("SIM_HOURS") {
            config.hours = hours;
        }
        if let Some(money) = read_env::<i64>("SIM_MONEY") {
            config.money = money;
        }
        if let Some(influence) = read_env::<i64>("SIM_INFLUENCE") {
            config.influence = influence;
        }
        if let Some(rate) = read_env::<f32>("SIM_RATE").filter(|rate| rate.is_finite()) {
            config.rate = rate;
        }
        if let Some(members) = read_env::<u32>("SIM_MEMBERS") {
            config.members = members;
        }
        if let Ok(script) = env::var("SIM_ACTIONS") {
            config.script = PlannedAction::parse_script(&script);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
