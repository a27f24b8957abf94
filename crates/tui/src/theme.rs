use ratatui::style::Color;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub suggestions_border: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub announce_fg: Color,
    pub timestamp_fg: Color,
    pub notice_fg: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    suggestions_border: Color::DarkGray,
    selected_fg: Color::Black,
    selected_bg: Color::Cyan,
    announce_fg: Color::DarkGray,
    timestamp_fg: Color::Yellow,
    notice_fg: Color::Red,
};
