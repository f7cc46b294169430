use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One measurement slot of the station's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SensorField {
    Temperature,
    Humidity,
    Pressure,
    SoilMoisture,
    SoilTemperature,
    WaterLevel,
    Wind,
    Irrigation,
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SensorField::Temperature => "temperature",
            SensorField::Humidity => "humidity",
            SensorField::Pressure => "pressure",
            SensorField::SoilMoisture => "soilMoisture",
            SensorField::SoilTemperature => "soilTemperature",
            SensorField::WaterLevel => "waterLevel",
            SensorField::Wind => "wind",
            SensorField::Irrigation => "irrigation",
        };
        f.write_str(s)
    }
}

/// Latest textual value of every measurement.
///
/// Fields not yet reported by the device hold an empty string. Values are kept
/// exactly as the device printed them (minus the unit), so `"23.5"` and
/// `"Kuzey 12 km/h"` are equally valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    /// Air temperature, °C.
    pub temperature: String,
    /// Relative air humidity, %.
    pub humidity: String,
    /// Barometric pressure, hPa.
    pub pressure: String,
    pub soil_moisture: String,
    /// Soil temperature, °C.
    pub soil_temperature: String,
    /// Tank water level, %.
    pub water_level: String,
    pub wind: String,
    pub irrigation: String,
}

impl SensorSnapshot {
    /// Overwrite a single field.
    pub fn set(&mut self, field: SensorField, value: String) {
        let slot = match field {
            SensorField::Temperature => &mut self.temperature,
            SensorField::Humidity => &mut self.humidity,
            SensorField::Pressure => &mut self.pressure,
            SensorField::SoilMoisture => &mut self.soil_moisture,
            SensorField::SoilTemperature => &mut self.soil_temperature,
            SensorField::WaterLevel => &mut self.water_level,
            SensorField::Wind => &mut self.wind,
            SensorField::Irrigation => &mut self.irrigation,
        };
        *slot = value;
    }
}
