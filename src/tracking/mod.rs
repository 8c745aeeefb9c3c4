pub mod geo;
pub mod ip_extractor;

pub use geo::GeoResolver;
pub use ip_extractor::extract_client_ip;
