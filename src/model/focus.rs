/// Per-body camera flags. Each body keeps its own independent pair of
/// toggles, but setting either one clears it everywhere else, so at most
/// one body has `focus` and at most one has `look_at` at any time.
#[derive(Debug)]
pub struct FocusTable {
    entries: Vec<FocusEntry>,
}

#[derive(Debug)]
pub struct FocusEntry {
    pub name: String,
    pub focus: bool,
    pub look_at: bool,
}

impl FocusTable {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        FocusTable {
            entries: names
                .into_iter()
                .map(|name| FocusEntry {
                    name,
                    focus: false,
                    look_at: false,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[FocusEntry] {
        &self.entries
    }

    pub fn set_focus(&mut self, name: &str, on: bool) {
        for entry in &mut self.entries {
            entry.focus = on && entry.name == name;
        }
    }

    pub fn set_look_at(&mut self, name: &str, on: bool) {
        for entry in &mut self.entries {
            entry.look_at = on && entry.name == name;
        }
    }

    pub fn toggle_focus(&mut self, name: &str) {
        let on = !self.is_focused(name);
        self.set_focus(name, on);
    }

    pub fn toggle_look_at(&mut self, name: &str) {
        let on = !self
            .entries
            .iter()
            .any(|e| e.name == name && e.look_at);
        self.set_look_at(name, on);
    }

    pub fn is_focused(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name && e.focus)
    }

    /// The body the camera tracks, if any.
    pub fn focused(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.focus)
            .map(|e| e.name.as_str())
    }

    /// The body the camera was asked to aim at, if any.
    pub fn look_at(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.look_at)
            .map(|e| e.name.as_str())
    }
}
