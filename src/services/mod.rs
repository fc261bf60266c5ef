pub mod encoder_service;
pub mod fetch_service;
pub mod legend_service;
pub mod map_service;
pub mod plate_service;
pub mod quake_service;
pub mod snapshot_service;
