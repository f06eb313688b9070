pub mod enriched;
pub mod restaurant;
pub mod spatial;
pub mod weather;

pub use enriched::{DatePartition, EnrichedDataset, EnrichedRecord};
pub use restaurant::{
    CoordinateSource, CoordinateState, Franchise, NormalizedRestaurant, RestaurantRecord,
};
pub use spatial::{Coordinates, SpatialBucket};
pub use weather::{NormalizedObservation, NormalizedWeather, WeatherObservations, WeatherRecord};
