//! External environmental data providers feeding the risk engine.
//!
//! Both are treated as opaque read-only lookups. Hosts plug in real
//! integrations; the static implementations cover tests and degraded modes.

use zonewatch_core::{Coordinates, TerrainComplexity, WeatherConditions};

pub trait WeatherProvider: Send + Sync {
    fn current_weather(&self, location: Coordinates) -> WeatherConditions;
}

pub trait TerrainProvider: Send + Sync {
    fn terrain_complexity(&self, location: Coordinates) -> TerrainComplexity;
}

/// Fixed weather, regardless of location.
pub struct StaticWeather(pub WeatherConditions);

impl StaticWeather {
    /// Clear conditions: no storm, full visibility, mild temperature.
    pub fn clear() -> Self {
        Self(WeatherConditions {
            is_storm: false,
            visibility_m: 10_000.0,
            temperature_c: 22.0,
        })
    }
}

impl WeatherProvider for StaticWeather {
    fn current_weather(&self, _location: Coordinates) -> WeatherConditions {
        self.0
    }
}

/// Fixed terrain tier, regardless of location.
pub struct StaticTerrain(pub TerrainComplexity);

impl TerrainProvider for StaticTerrain {
    fn terrain_complexity(&self, _location: Coordinates) -> TerrainComplexity {
        self.0
    }
}
