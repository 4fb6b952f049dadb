use crate::models::Vehicle;

/// State of the vehicle-position feed.
///
/// One fetch is issued on activation; refreshes are re-triggered by
/// the surrounding scheduler, never by this state itself. The vehicle
/// set is replaced wholesale on every completed fetch — there is no
/// incremental diffing. Cancellation is expressed by aborting the
/// fetch task, so no completion transition runs and the error state
/// stays untouched.
#[derive(Debug, Default)]
pub struct FeedState {
    /// True only while a request is outstanding
    pub loading: bool,
    /// Last feed failure, cleared on each new attempt
    pub error: Option<String>,
    /// Current raw vehicle set
    pub vehicles: Vec<Vehicle>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetch was issued: raise the loading flag and clear any
    /// previous error before the outcome is known.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// The fetch succeeded: replace the vehicle set wholesale.
    pub fn apply_vehicles(&mut self, vehicles: Vec<Vehicle>) {
        self.loading = false;
        self.vehicles = vehicles;
    }

    /// The fetch failed: surface the message, keep the current set.
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}
