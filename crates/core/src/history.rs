use chrono::{DateTime, Local};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    pub timestamp: String,
}

/// Chosen suggestions, unique by title, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns false when an entry with the same title already exists.
    pub fn add_entry(&mut self, title: &str) -> bool {
        self.add_entry_at(title, Local::now())
    }

    pub fn add_entry_at(&mut self, title: &str, at: DateTime<Local>) -> bool {
        if self.contains(title) {
            return false;
        }
        self.entries.push(HistoryEntry {
            title: title.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        });
        true
    }

    pub fn remove_entry(&mut self, title: &str) -> bool {
        match self.entries.iter().position(|e| e.title == title) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|e| e.title == title)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, h, m, 0).unwrap()
    }

    #[test]
    fn add_is_idempotent_on_title() {
        let mut h = History::new();
        assert!(h.add_entry_at("Batman", at(9, 5)));
        assert!(!h.add_entry_at("Batman", at(10, 0)));
        assert_eq!(h.len(), 1);
        assert_eq!(h.entries()[0].timestamp, "2024-03-07 09:05");
    }

    #[test]
    fn titles_match_case_sensitively() {
        let mut h = History::new();
        h.add_entry("Batman");
        h.add_entry("batman");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn remove_then_add_gets_fresh_timestamp() {
        let mut h = History::new();
        h.add_entry_at("Batman", at(9, 5));
        h.add_entry_at("Alien", at(9, 6));
        assert!(h.remove_entry("Batman"));
        assert!(h.add_entry_at("Batman", at(11, 30)));
        let titles: Vec<_> = h.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Batman"]);
        assert_eq!(h.entries()[1].timestamp, "2024-03-07 11:30");
    }

    #[test]
    fn removing_unknown_title_is_noop() {
        let mut h = History::new();
        h.add_entry("Alien");
        assert!(!h.remove_entry("Aliens"));
        assert_eq!(h.len(), 1);
    }
}
