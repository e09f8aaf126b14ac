use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monthly averages for one city, aligned to `TemperatureDataset::categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySeries {
    pub name: String,
    /// `#RRGGBB` line color.
    pub color: String,
    pub monthly_means: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureDataset {
    pub source: String,
    pub categories: Vec<String>,
    pub cities: Vec<CitySeries>,
}

impl TemperatureDataset {
    /// Tokyo and New York monthly averages.
    #[must_use]
    pub fn world_climate() -> Self {
        Self {
            source: "WorldClimate.com".to_owned(),
            categories: MONTHS.iter().map(|month| (*month).to_owned()).collect(),
            cities: vec![
                CitySeries {
                    name: "Tokyo".to_owned(),
                    color: "#0099FF".to_owned(),
                    monthly_means: vec![
                        7.0, 6.9, 9.5, 14.5, 18.2, 21.5, 25.2, 26.5, 23.3, 18.3, 13.9, 9.6,
                    ],
                },
                CitySeries {
                    name: "New York".to_owned(),
                    color: "#FF9933".to_owned(),
                    monthly_means: vec![
                        -0.2, 0.8, 5.7, 11.3, 17.0, 22.0, 24.8, 24.1, 20.1, 14.1, 8.6, 2.5,
                    ],
                },
            ],
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for city in &self.cities {
            if city.monthly_means.len() > self.categories.len() {
                return Err(ChartError::InvalidData(format!(
                    "series `{}` has {} samples for {} categories",
                    city.name,
                    city.monthly_means.len(),
                    self.categories.len()
                )));
            }
            if city.monthly_means.iter().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "series `{}` contains a non-finite sample",
                    city.name
                )));
            }
        }
        Ok(())
    }
}
