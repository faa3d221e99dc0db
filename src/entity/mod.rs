pub mod audit_logs;
pub mod auxiliary_forms;
pub mod drafts;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod reservations;

pub use audit_logs::Entity as AuditLogs;
pub use auxiliary_forms::Entity as AuxiliaryForms;
pub use drafts::Entity as Drafts;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use reservations::Entity as Reservations;
