pub mod race_data;

pub use race_data::RaceDataProvider;
