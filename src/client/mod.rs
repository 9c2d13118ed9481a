pub mod actions;
pub mod api;
pub mod store;
pub mod views;

pub use actions::Actions;
pub use api::{ApiClient, ClientError, Message};
pub use store::{Action, ClientStore, Dispatcher, RootState};
