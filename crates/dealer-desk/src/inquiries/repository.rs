use super::domain::{Inquiry, InquiryId, InquiryKind};
use crate::store::RepositoryError;

/// Storage abstraction over the four inquiry tables. Rows are insert-only.
pub trait InquiryRepository: Send + Sync {
    fn insert(&self, inquiry: Inquiry) -> Result<Inquiry, RepositoryError>;
    fn fetch(&self, kind: InquiryKind, id: &InquiryId) -> Result<Option<Inquiry>, RepositoryError>;
    /// Rows of one kind, newest first.
    fn list(&self, kind: InquiryKind) -> Result<Vec<Inquiry>, RepositoryError>;
    /// Remove a row; `NotFound` when the id is unknown for that kind.
    fn delete(&self, kind: InquiryKind, id: &InquiryId) -> Result<(), RepositoryError>;
    fn count(&self, kind: InquiryKind) -> Result<usize, RepositoryError> {
        Ok(self.list(kind)?.len())
    }
}
