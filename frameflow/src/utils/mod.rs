pub use crate::utils::events::{EventHandler, EventManager};
pub use crate::utils::value::{Value, ValueType};

pub mod events;
mod value;
