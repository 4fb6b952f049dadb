use std::collections::{HashMap, HashSet};

use crate::models::{ArrivalEstimate, Stop, VehicleId};

/// Token identifying one query attempt. Responses carrying a stale
/// token are discarded, so a late reply to an abandoned query can
/// never overwrite fresher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryToken(u64);

/// The ETA session: stop, estimates, countdowns, filter set, and the
/// focus-consumed flag, bundled into one state machine so they can
/// only ever be reset together.
///
/// Every transition is a total function from the old state to the new
/// one, applied while holding the store's write guard; partial updates
/// are not representable.
#[derive(Debug, Default)]
pub struct EtaSession {
    /// Bumped by `begin_query`; stale responses are ignored
    generation: u64,
    /// True while a query's sub-requests are outstanding
    pub in_flight: bool,
    /// Validation or query failure surfaced to the user
    pub error: Option<String>,
    /// Metadata of the queried stop, present only after a success
    pub stop: Option<Stop>,
    /// Arrival records in server order, capped for display
    pub estimates: Vec<ArrivalEstimate>,
    /// `None` = no filter, show all vehicles; `Some` after a success
    filter: Option<HashSet<VehicleId>>,
    /// Remaining seconds per arriving vehicle
    countdowns: HashMap<VehicleId, u32>,
    /// True once the automatic map focus for this session has fired
    focus_consumed: bool,
}

impl EtaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> Option<&HashSet<VehicleId>> {
        self.filter.as_ref()
    }

    pub fn countdown_for(&self, id: &VehicleId) -> Option<u32> {
        self.countdowns.get(id).copied()
    }

    pub fn countdowns(&self) -> &HashMap<VehicleId, u32> {
        &self.countdowns
    }

    /// Tear down everything the session produced. Estimates, stop,
    /// filter, countdowns, and the focus flag live and die together.
    fn clear(&mut self) {
        self.stop = None;
        self.estimates.clear();
        self.filter = None;
        self.countdowns.clear();
        self.focus_consumed = false;
    }

    /// Empty or whitespace-only input: full reset, surface the
    /// validation error, no query is issued.
    pub fn reject_empty_input(&mut self) {
        self.clear();
        // Any outstanding query is now abandoned; its responses must
        // not resurrect the state we just cleared.
        self.generation += 1;
        self.in_flight = false;
        self.error = Some("Please enter stop ID".to_string());
    }

    /// A new query attempt starts: full reset, raise the in-flight
    /// flag, and hand out the token that its responses must present.
    pub fn begin_query(&mut self) -> QueryToken {
        self.clear();
        self.error = None;
        self.in_flight = true;
        self.generation += 1;
        QueryToken(self.generation)
    }

    fn is_stale(&self, token: QueryToken) -> bool {
        token.0 != self.generation
    }

    /// Both sub-requests succeeded: atomically install the new
    /// snapshot. Countdowns are seeded from the arrivals (first
    /// occurrence wins, clamped at zero) and the filter set is the
    /// de-duplicated arrival identifiers. Returns false when the
    /// token is stale and nothing was applied.
    pub fn apply_success(
        &mut self,
        token: QueryToken,
        mut arrivals: Vec<ArrivalEstimate>,
        stop: Stop,
        display_limit: usize,
    ) -> bool {
        if self.is_stale(token) {
            return false;
        }

        arrivals.truncate(display_limit);

        let mut countdowns = HashMap::new();
        let mut filter = HashSet::new();
        for arrival in &arrivals {
            countdowns
                .entry(arrival.bus_id.clone())
                .or_insert_with(|| arrival.seed_seconds());
            filter.insert(arrival.bus_id.clone());
        }

        self.in_flight = false;
        self.error = None;
        self.stop = Some(stop);
        self.estimates = arrivals;
        self.filter = Some(filter);
        self.countdowns = countdowns;
        self.focus_consumed = false;
        true
    }

    /// Either sub-request failed: the whole query fails as a unit.
    /// Returns false when the token is stale and nothing was applied.
    pub fn apply_failure(&mut self, token: QueryToken, message: impl Into<String>) -> bool {
        if self.is_stale(token) {
            return false;
        }

        self.clear();
        self.in_flight = false;
        self.error = Some(message.into());
        true
    }

    /// Advance every countdown by one second, saturating at zero.
    /// Returns whether any value changed, so callers can skip update
    /// notifications on idle ticks.
    pub fn tick(&mut self) -> bool {
        if self.countdowns.is_empty() {
            return false;
        }

        let mut changed = false;
        for remaining in self.countdowns.values_mut() {
            if *remaining > 0 {
                *remaining -= 1;
                changed = true;
            }
        }
        changed
    }

    /// One-shot automatic map focus for the current session. Yields
    /// the stop position (falling back to the supplied map center for
    /// stops without valid coordinates) the first time it is called
    /// after a success; afterwards, and without a stop, nothing.
    pub fn take_focus(&mut self, fallback_center: (f64, f64)) -> Option<(f64, f64)> {
        if self.focus_consumed {
            return None;
        }
        let stop = self.stop.as_ref()?;
        self.focus_consumed = true;
        Some(stop.position_or(fallback_center))
    }
}
