pub mod controller;
pub mod inputs;
pub mod validation;
pub mod view;

pub use controller::FormController;
pub use inputs::{ChoiceGroup, FormInput};
pub use validation::ValidationError;
pub use view::Page;
