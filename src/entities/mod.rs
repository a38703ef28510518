//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cash_drawer;
pub mod cash_drop;
pub mod cash_pickup;
pub mod employee;
pub mod payment;
pub mod shift_note;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use cash_drawer::{
    Column as CashDrawerColumn, Entity as CashDrawer, Model as CashDrawerModel,
};
pub use cash_drop::{Column as CashDropColumn, Entity as CashDrop, Model as CashDropModel};
pub use cash_pickup::{
    Column as CashPickupColumn, Entity as CashPickup, Model as CashPickupModel,
};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use shift_note::{Column as ShiftNoteColumn, Entity as ShiftNote, Model as ShiftNoteModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
