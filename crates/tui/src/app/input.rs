use unicode_segmentation::UnicodeSegmentation;

use super::App;

// Single-line field editing on grapheme boundaries. `input_cursor` counts
// graphemes, not bytes.
impl App {
    pub fn insert_text(&mut self, s: &str) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        let mut new_input = parts[..idx].concat();
        new_input.push_str(s);
        new_input.push_str(&parts[idx..].concat());
        self.input = new_input;
        let added = s.graphemes(true).count();
        self.input_cursor = (idx + added).min(self.input.graphemes(true).count());
    }

    pub fn delete_left_grapheme(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        parts.remove(idx - 1);
        self.input = parts.concat();
        self.input_cursor = idx - 1;
    }

    pub fn delete_right_grapheme(&mut self) {
        let mut parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.input = parts.concat();
        }
    }

    pub fn move_cursor_line_start(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_line_end(&mut self) {
        self.input_cursor = self.input.graphemes(true).count();
    }

    pub fn delete_prev_word(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let end = self.input_cursor.min(parts.len());
        let start = word_start(&parts, end);
        let mut newp = parts.clone();
        newp.drain(start..end);
        self.input = newp.concat();
        self.input_cursor = start;
    }

    pub fn kill_to_line_start(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let end = self.input_cursor.min(parts.len());
        self.input = parts[end..].concat();
        self.input_cursor = 0;
    }

    pub fn kill_to_line_end(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let end = self.input_cursor.min(parts.len());
        self.input = parts[..end].concat();
    }

    pub fn move_cursor_word_left(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        self.input_cursor = word_start(&parts, self.input_cursor.min(parts.len()));
    }

    pub fn move_cursor_word_right(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.input_cursor = i;
    }
}

fn word_start(parts: &[&str], from: usize) -> usize {
    let mut i = from;
    while i > 0 && parts[i - 1].trim().is_empty() {
        i -= 1;
    }
    while i > 0 && !parts[i - 1].trim().is_empty() {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use suggest_core::WidgetConfig;

    fn app_with(text: &str, cursor: usize) -> App {
        let mut app = App::offline(WidgetConfig::default());
        app.input = text.to_string();
        app.input_cursor = cursor;
        app
    }

    #[test]
    fn insert_in_the_middle() {
        let mut app = app_with("btman", 1);
        app.insert_text("a");
        assert_eq!(app.input, "batman");
        assert_eq!(app.input_cursor, 2);
    }

    #[test]
    fn backspace_respects_graphemes() {
        let mut app = app_with("amélie", 3);
        app.delete_left_grapheme();
        assert_eq!(app.input, "amlie");
        assert_eq!(app.input_cursor, 2);
    }

    #[test]
    fn word_operations() {
        let mut app = app_with("the dark knight", 15);
        app.move_cursor_word_left();
        assert_eq!(app.input_cursor, 9);
        app.delete_prev_word();
        assert_eq!(app.input, "the knight");
        assert_eq!(app.input_cursor, 4);
        app.move_cursor_word_right();
        assert_eq!(app.input_cursor, 10);
    }

    #[test]
    fn kill_both_ways() {
        let mut app = app_with("batman returns", 6);
        app.kill_to_line_end();
        assert_eq!(app.input, "batman");
        app.input_cursor = 3;
        app.kill_to_line_start();
        assert_eq!(app.input, "man");
        assert_eq!(app.input_cursor, 0);
    }
}
