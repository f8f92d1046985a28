pub mod event_loop;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod view;

pub use view::TuiApp;
