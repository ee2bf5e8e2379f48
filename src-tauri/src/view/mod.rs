pub mod coordinator;
pub mod poller;
pub mod state;
pub mod surface;

pub use coordinator::{ViewCoordinator, ViewHandle, ViewInbox, ViewInput};
pub use poller::{PollOutcome, PollTag, PollTimer};
pub use state::{
    CameraListView, Selection, StatusLine, StreamPanel, ViewPhase, ViewSnapshot, ViewState,
};
pub use surface::{TauriSurface, ViewSurface};
