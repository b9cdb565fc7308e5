mod live_view;
mod state;

pub use live_view::{LiveModel, LiveView};
pub use state::LiveViewState;
