pub mod controller;
pub mod site_forms;

pub use controller::LeadsController;
