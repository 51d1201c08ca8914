//! Query state shared between dispatch and the staleness check.

/// Handle for one dispatched lookup.
///
/// Tickets are ordered by dispatch; only the most recently issued ticket is
/// current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    id: u64,
    query: String,
}

impl QueryTicket {
    /// The query this ticket was issued for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Monotonic dispatch number.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Most recent dispatched query and the suggestions accepted for it.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    current: u64,
    last_query: String,
    last_suggestions: Vec<String>,
    suggestions_for: Option<u64>,
}

impl QueryState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently dispatched query.
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Most recently accepted suggestions.
    pub fn last_suggestions(&self) -> &[String] {
        &self.last_suggestions
    }

    /// Record a new dispatch and return its ticket. Earlier tickets become stale.
    pub(crate) fn begin(&mut self, query: &str) -> QueryTicket {
        self.current += 1;
        self.last_query = query.to_string();
        QueryTicket {
            id: self.current,
            query: self.last_query.clone(),
        }
    }

    /// Ticket id of the dispatch that produced `last_suggestions`.
    pub(crate) fn suggestions_id(&self) -> Option<u64> {
        self.suggestions_for
    }

    /// Check whether `ticket` is still the freshest dispatch.
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.id == self.current
    }

    /// Store suggestions for `ticket` if it is current. Returns whether they were stored.
    pub(crate) fn accept(&mut self, ticket: &QueryTicket, suggestions: Vec<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.last_suggestions = suggestions;
        self.suggestions_for = Some(ticket.id);
        true
    }
}
