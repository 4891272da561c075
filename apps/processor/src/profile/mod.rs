// Alumni profile schema: models, field coercion, normalisation, validation and quality scoring.
// Pure data and rules; no I/O.

pub mod lenient;
pub mod models;
pub mod normalize;
pub mod quality;
pub mod validation;
