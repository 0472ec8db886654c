//! Mount bookkeeping: at most one live field per slot.
//!
//! A [`Slot`] owns the active instance. Mounting into an occupied slot
//! disposes the previous instance before the new one is created, so the
//! two never overlap. Every mount hands back a [`Ticket`]; releasing a
//! ticket that is stale (already released, or superseded by a later
//! mount) does nothing, which makes disposers safe to call repeatedly.

pub trait Dispose {
    fn dispose(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Slot<T: Dispose> {
    active: Option<(Ticket, T)>,
    next: u64,
}

impl<T: Dispose> Default for Slot<T> {
    fn default() -> Self {
        Self {
            active: None,
            next: 0,
        }
    }
}

impl<T: Dispose> Slot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disposes any current instance, then installs the one `create` builds.
    /// If `create` fails the slot stays empty.
    pub fn mount<E>(&mut self, create: impl FnOnce() -> Result<T, E>) -> Result<Ticket, E> {
        self.clear();
        let value = create()?;
        self.next += 1;
        let ticket = Ticket(self.next);
        self.active = Some((ticket, value));
        Ok(ticket)
    }

    /// Disposes the instance `ticket` refers to; false if it is no longer active.
    pub fn release(&mut self, ticket: Ticket) -> bool {
        match &self.active {
            Some((current, _)) if *current == ticket => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Disposes whatever is mounted.
    pub fn clear(&mut self) {
        if let Some((_, mut prev)) = self.active.take() {
            prev.dispose();
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn active(&self) -> Option<&T> {
        self.active.as_ref().map(|(_, v)| v)
    }

    pub fn active_mut(&mut self) -> Option<&mut T> {
        self.active.as_mut().map(|(_, v)| v)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        matches!(&self.active, Some((t, _)) if *t == ticket)
    }
}

/// Runs a teardown action at most once.
pub struct Disposer {
    action: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// An already-spent disposer.
    pub fn noop() -> Self {
        Self { action: None }
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.action.is_none()
    }
}

impl Dispose for Disposer {
    fn dispose(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
            .field("spent", &self.is_spent())
            .finish()
    }
}
