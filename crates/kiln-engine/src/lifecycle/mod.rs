//! Resource-lifecycle sequencing.
//!
//! Ordered acquisition of Window -> UiContext -> RenderBackend, a per-frame
//! tick between them, and teardown in strict reverse order:
//! - acquisition failure rolls back everything acquired so far
//! - teardown always visits every live slot, collecting failures
//! - shutdown is idempotent
//!
//! The core never touches the resources themselves; it drives the
//! collaborator traits in [`collab`] and tracks presence/absence per slot.

mod collab;
mod error;
mod frame;
mod guard;
mod handle;
mod sequence;
mod sequencer;
mod slot;

#[cfg(test)]
pub(crate) mod fakes;

pub use collab::{RenderLibrary, UiLibrary, WindowSystem};
pub use error::{InitError, ShutdownError, ShutdownReport};
pub use frame::{FrameContext, PlatformEvent, RawInput, SurfaceSize};
pub use guard::LifecycleGuard;
pub use handle::{HandleAllocator, RawHandle, RenderBackendHandle, UiContextHandle, WindowHandle};
pub use sequence::LifecycleSequence;
pub use sequencer::{Sequencer, stages_for};
pub use slot::{ResourceKind, ResourceSlot, SlotState};
