pub mod concurrent_reader;
pub mod restaurant_reader;
pub mod weather_reader;

pub use concurrent_reader::{ConcurrentReader, InputData};
pub use restaurant_reader::RestaurantReader;
pub use weather_reader::WeatherReader;
