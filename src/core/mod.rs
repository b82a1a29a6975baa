// Core algorithm exports
pub mod encoding;
pub mod filters;
pub mod neighbors;
pub mod recommender;
pub mod scaler;

pub use encoding::{LabelEncoder, EncoderMap, EncoderClasses, EncodeError, encode_field, encoded_column};
pub use filters::{matches_location, distinct_states};
pub use neighbors::{NeighborIndex, NeighborParams, DistanceMetric, Neighbor, IndexError};
pub use recommender::{Recommender, RecommendResult, RecommendError};
pub use scaler::{StandardScaler, ScalerError};
