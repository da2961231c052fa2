pub mod lat_lon;
pub mod observation_type;
pub mod station;
