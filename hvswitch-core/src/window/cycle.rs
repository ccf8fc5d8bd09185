//! Iteration over one full period

use crate::channels::ChannelBits;

use super::scheduler::WindowScheduler;

/// Yields `(slot, bitmap)` for every slot of the scheduler's current period
#[derive(Debug, Clone)]
pub struct WindowCycle<'a, const PORTS: usize> {
    scheduler: &'a WindowScheduler<PORTS>,
    next: u16,
}

impl<'a, const PORTS: usize> WindowCycle<'a, PORTS> {
    pub(crate) fn new(scheduler: &'a WindowScheduler<PORTS>) -> Self {
        Self { scheduler, next: 0 }
    }
}

impl<const PORTS: usize> Iterator for WindowCycle<'_, PORTS> {
    type Item = (u16, ChannelBits<PORTS>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.scheduler.period() {
            return None;
        }
        let window = self.next;
        self.next += 1;
        Some((window, self.scheduler.compute_window(window)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::from(self.scheduler.period().saturating_sub(self.next));
        (left, Some(left))
    }
}

impl<const PORTS: usize> ExactSizeIterator for WindowCycle<'_, PORTS> {}
