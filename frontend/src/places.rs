use shared::{Coordinate, PlaceSuggestion};

/// Logical endpoint slot. Suggestion and resolve calls are scoped per slot;
/// the two slots never share sequence counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Source,
    Target,
}

impl Slot {
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "Start",
            Self::Target => "End",
        }
    }
}

/// Per-slot endpoint state covering both entry styles: raw lat/lng fields
/// (coordinate mode) and query/suggestions/resolved (place-search mode).
///
/// Both remote operations are keyed by a monotonic sequence number; a
/// response is applied only when its sequence is still the slot's current
/// one, so the last-initiated call wins regardless of completion order.
#[derive(Debug, Clone, Default)]
pub struct EndpointSlot {
    pub lat: String,
    pub lng: String,
    pub query: String,
    pub suggestions: Vec<PlaceSuggestion>,
    resolved: Option<Coordinate>,
    suggest_seq: u64,
    resolve_seq: u64,
}

impl EndpointSlot {
    pub fn with_coordinate(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat.to_string(),
            lng: coord.lng.to_string(),
            ..Self::default()
        }
    }

    /// Record a query edit. Any previously resolved coordinate is dropped
    /// (a fresh explicit selection is required before submitting) and
    /// in-flight suggest *and* resolve calls are invalidated.
    ///
    /// Returns the sequence to debounce a new suggestion fetch under, or
    /// `None` for empty/whitespace input, which clears the list without a
    /// network call.
    pub fn edit_query(&mut self, text: String) -> Option<u64> {
        self.query = text;
        self.resolved = None;
        self.suggestions.clear();
        self.suggest_seq += 1;
        self.resolve_seq += 1;
        if self.query.trim().is_empty() {
            None
        } else {
            Some(self.suggest_seq)
        }
    }

    /// True while `seq` identifies the most recently initiated suggestion
    /// query; used at debounce expiry to decide whether to fetch at all.
    pub fn suggest_current(&self, seq: u64) -> bool {
        seq == self.suggest_seq
    }

    /// Apply a suggestion list if it belongs to the current query.
    /// Returns false for a stale response, which the caller discards.
    pub fn accept_suggestions(&mut self, seq: u64, suggestions: Vec<PlaceSuggestion>) -> bool {
        if !self.suggest_current(seq) {
            return false;
        }
        self.suggestions = suggestions;
        true
    }

    /// Start resolving a picked suggestion: the query takes the picked
    /// label, the list closes, and a new resolve sequence is issued.
    pub fn begin_resolve(&mut self, suggestion: &PlaceSuggestion) -> u64 {
        self.query = suggestion.label.clone();
        self.suggestions.clear();
        self.resolved = None;
        self.suggest_seq += 1;
        self.resolve_seq += 1;
        self.resolve_seq
    }

    /// Apply a resolve outcome if it belongs to the most recently initiated
    /// resolve. A failed resolve leaves the endpoint unresolved; it never
    /// falls back to an earlier coordinate.
    pub fn accept_resolution(&mut self, seq: u64, coord: Option<Coordinate>) -> bool {
        if seq != self.resolve_seq {
            return false;
        }
        self.resolved = coord;
        true
    }

    pub fn edit_lat(&mut self, value: String) {
        self.lat = value;
    }

    pub fn edit_lng(&mut self, value: String) {
        self.lng = value;
    }

    pub fn set_coordinate(&mut self, coord: Coordinate) {
        self.lat = format!("{:.5}", coord.lat);
        self.lng = format!("{:.5}", coord.lng);
    }

    /// The coordinate this slot contributes to a request, if any.
    /// Coordinate-mode text wins when it parses to a valid position;
    /// otherwise only a freshly resolved place counts.
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.parsed_entry().or(self.resolved)
    }

    fn parsed_entry(&self) -> Option<Coordinate> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lng.trim().parse::<f64>().ok()?;
        Coordinate::new(lat, lng)
    }
}
