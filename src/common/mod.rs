mod state;

pub use state::{AppState, SharedDashboard};
