//! Statistical augmentation: isolation-forest outlier detection, KNN
//! imputation with temporary label encoding, and rule-based cleaning
//! suggestions.

mod augmentor;
pub mod encoding;
mod isolation;
mod knn;
mod suggest;

pub use augmentor::{
    Augmentor, ImputationReport, OutlierMask, DEFAULT_CONTAMINATION, DEFAULT_NEIGHBORS,
};
pub use encoding::{LabelEncoding, MAX_CATEGORIES};
pub use isolation::IsolationForest;
pub use knn::{nan_euclidean, KnnImputer, Weights};
pub use suggest::{Suggestion, SuggestionEngine, SuggestionKind};
