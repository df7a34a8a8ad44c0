use super::collab::{RenderLibrary, UiLibrary, WindowSystem};
use super::error::ShutdownReport;
use super::frame::{FrameContext, RawInput};
use super::sequence::LifecycleSequence;
use super::sequencer::Sequencer;

/// Scoped ownership of an initialized sequence.
///
/// Dropping the guard shuts the sequence down, so early returns and panics
/// unwinding through the run loop still release every resource. `finish`
/// does the same explicitly and returns the report; the drop that follows is
/// then a no-op.
pub struct LifecycleGuard<'s, W, U, R>
where
    W: WindowSystem,
    U: UiLibrary,
    R: RenderLibrary<W>,
{
    sequencer: &'s mut Sequencer<W, U, R>,
    sequence: LifecycleSequence,
}

impl<'s, W, U, R> LifecycleGuard<'s, W, U, R>
where
    W: WindowSystem,
    U: UiLibrary,
    R: RenderLibrary<W>,
{
    pub(crate) fn new(sequencer: &'s mut Sequencer<W, U, R>, sequence: LifecycleSequence) -> Self {
        Self { sequencer, sequence }
    }

    pub fn sequence(&self) -> &LifecycleSequence {
        &self.sequence
    }

    /// Split borrow of the sequencer and its sequence.
    pub fn split(&mut self) -> (&mut Sequencer<W, U, R>, &mut LifecycleSequence) {
        (&mut *self.sequencer, &mut self.sequence)
    }

    pub fn tick(&mut self, input: &mut RawInput) -> FrameContext {
        self.sequencer.tick(&mut self.sequence, input)
    }

    pub fn finish(mut self) -> ShutdownReport {
        self.sequencer.shutdown(&mut self.sequence)
    }
}

impl<W, U, R> Drop for LifecycleGuard<'_, W, U, R>
where
    W: WindowSystem,
    U: UiLibrary,
    R: RenderLibrary<W>,
{
    fn drop(&mut self) {
        if !self.sequence.is_released() {
            log::debug!("lifecycle guard dropped with live resources; shutting down");
            self.sequencer.shutdown(&mut self.sequence);
        }
    }
}
