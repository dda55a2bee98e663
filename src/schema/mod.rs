//! CSV header handling and table shape reconciliation.

pub mod identifier;
pub mod reconcile;

pub use identifier::Identifier;
pub use reconcile::reconcile;
