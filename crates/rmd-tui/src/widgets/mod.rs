//! Widgets for rendering game state
//!
//! Stateless widgets borrow what they draw; selection state lives in the
//! stateful structs (ListChooser, BodyViewer) the App owns.

pub mod body_viewer;
pub mod list;
pub mod map;
pub mod messages;
pub mod status;
pub mod text;

pub use body_viewer::{BodyViewer, BodyViewerWidget, ViewerPane};
pub use list::{ListChooser, ListChooserWidget};
pub use map::MapWidget;
pub use messages::MessagesWidget;
pub use status::StatusWidget;
pub use text::{ColoredText, ObjectLink, TextBox};
