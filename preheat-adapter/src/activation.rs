/// Proof that an activation was admitted, carried through the async resolve
/// and handed back to [`ActivationGuard::settle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationTicket<I> {
    item: I,
    token: u64,
}

impl<I> ActivationTicket<I> {
    pub fn item(&self) -> &I {
        &self.item
    }
}

/// What settling an activation amounts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation<I> {
    /// The resolve succeeded; open exactly one detail view for this item.
    Present(I),
    /// The resolve failed or came back empty; dismiss the loading indicator
    /// and do nothing else.
    Dismissed,
    /// The ticket belongs to a superseded or cancelled activation.
    Stale,
}

/// Single-flight guard for item activation.
///
/// A tap on an item kicks off an async content resolve before a detail view
/// can open; without a guard, a second tap during that window opens twice.
/// `begin` admits one activation at a time and refuses the rest.
#[derive(Clone, Debug, Default)]
pub struct ActivationGuard {
    in_flight: Option<u64>,
    last_token: u64,
}

impl ActivationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits an activation, or returns `None` while another is in flight.
    pub fn begin<I>(&mut self, item: I) -> Option<ActivationTicket<I>> {
        if self.in_flight.is_some() {
            ptrace!("activation refused: one already in flight");
            return None;
        }
        self.last_token = self.last_token.wrapping_add(1);
        self.in_flight = Some(self.last_token);
        Some(ActivationTicket {
            item,
            token: self.last_token,
        })
    }

    /// Settles an admitted activation with its resolve result.
    pub fn settle<I>(&mut self, ticket: ActivationTicket<I>, success: bool) -> Activation<I> {
        if self.in_flight != Some(ticket.token) {
            return Activation::Stale;
        }
        self.in_flight = None;
        if success {
            Activation::Present(ticket.item)
        } else {
            Activation::Dismissed
        }
    }

    /// Abandons the in-flight activation, if any. Its ticket settles as
    /// [`Activation::Stale`].
    pub fn cancel(&mut self) {
        self.in_flight = None;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}
