use std::sync::Arc;

use super::dataset::Dataset;
use super::errors::DomainError;

/// Persistence port. The whole dataset is loaded and committed as one unit;
/// a `save` call is the commit boundary. Callers read a snapshot, derive the
/// next state, and hand it back.
pub trait RentalRepository: Send + Sync + 'static {
    fn load(&self) -> Result<Dataset, DomainError>;
    fn save(&self, data: &Dataset) -> Result<(), DomainError>;
}

impl<T: RentalRepository> RentalRepository for Arc<T> {
    fn load(&self) -> Result<Dataset, DomainError> {
        (**self).load()
    }

    fn save(&self, data: &Dataset) -> Result<(), DomainError> {
        (**self).save(data)
    }
}
