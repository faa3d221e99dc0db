pub mod auxiliary;
pub mod drafts;
pub mod orders;
pub mod products;
pub mod reservations;
