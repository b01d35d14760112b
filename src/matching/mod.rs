pub mod geo;
pub mod location_type;
pub mod name;
pub mod normalize;
pub mod phonetic;
pub mod scorer;
