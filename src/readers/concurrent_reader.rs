use crate::error::Result;
use crate::models::{RestaurantRecord, WeatherObservations};
use crate::readers::{RestaurantReader, WeatherReader};
use std::path::Path;
use tokio::task::JoinHandle;

/// Both pipeline inputs, fully loaded
#[derive(Debug)]
pub struct InputData {
    pub restaurants: Vec<RestaurantRecord>,
    pub weather: WeatherObservations,
}

pub struct ConcurrentReader;

impl ConcurrentReader {
    pub fn new() -> Self {
        Self
    }

    /// Read restaurants and weather at the same time on blocking tasks
    pub async fn read_inputs(
        &self,
        restaurants_path: &Path,
        weather_path: &Path,
    ) -> Result<InputData> {
        let restaurants_path = restaurants_path.to_path_buf();
        let weather_path = weather_path.to_path_buf();

        let restaurant_handle: JoinHandle<Result<Vec<RestaurantRecord>>> =
            tokio::task::spawn_blocking(move || {
                RestaurantReader::new().read_restaurants(&restaurants_path)
            });

        let weather_handle: JoinHandle<Result<WeatherObservations>> =
            tokio::task::spawn_blocking(move || {
                WeatherReader::new().read_observations(&weather_path)
            });

        let (restaurants, weather) = tokio::try_join!(restaurant_handle, weather_handle)?;

        Ok(InputData {
            restaurants: restaurants?,
            weather: weather?,
        })
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new()
    }
}
