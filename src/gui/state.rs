use crate::model::FocusTable;

/// All mutable simulation-session state that isn't the scene itself, owned
/// by the view and passed around explicitly (no module-level globals).
pub struct SimulationState {
    pub paused: bool,
    /// Simulated seconds advanced per rendered frame.
    pub timestep: f64,
    /// Total simulated seconds so far.
    pub elapsed: f64,
    pub focus: FocusTable,
    roster: Vec<String>,
    cursor: usize,
}

impl SimulationState {
    pub fn new(roster: Vec<String>, timestep: f64, paused: bool) -> Self {
        SimulationState {
            paused,
            timestep,
            elapsed: 0.0,
            focus: FocusTable::new(roster.iter().cloned()),
            roster,
            cursor: 0,
        }
    }

    /// The body the preview (and the F/L/X toggles) currently point at.
    pub fn selected_name(&self) -> &str {
        &self.roster[self.cursor]
    }

    pub fn select_next(&mut self) {
        self.cursor = (self.cursor + 1) % self.roster.len();
    }

    pub fn select_prev(&mut self) {
        self.cursor = (self.cursor + self.roster.len() - 1) % self.roster.len();
    }
}
