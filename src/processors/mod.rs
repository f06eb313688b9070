pub mod dedup;
pub mod enrichment_joiner;
pub mod pipeline;
pub mod restaurant_normalizer;
pub mod spatial_key;
pub mod weather_normalizer;

pub use enrichment_joiner::EnrichmentJoiner;
pub use pipeline::EnrichmentPipeline;
pub use restaurant_normalizer::{NormalizedRestaurants, RestaurantNormalizer, RestaurantStats};
pub use spatial_key::SpatialKeyDeriver;
pub use weather_normalizer::WeatherNormalizer;
