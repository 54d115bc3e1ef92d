pub mod backend;
pub mod geocode;
pub mod traits;
pub mod types;

pub use backend::{PropBotBackend, DEFAULT_API_URL};
pub use geocode::NominatimGeocoder;
pub use traits::{AnswerService, Geocoder, RecommendationService};
