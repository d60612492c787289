mod fixtures;
mod languages;
mod utils;
