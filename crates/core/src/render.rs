//! Pure builders from widget state to surface nodes, plus the attribute
//! writes that keep the ARIA state in step with them.

use crate::history::HistoryEntry;
use crate::search::Suggestion;
use crate::surface::{Element, Node, Surface};

pub const SELECTED_ID: &str = "chosen";

pub fn announcement(count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    format!(
        "You have {} suggestions. Use the UP and DOWN keys to navigate them.",
        count
    )
}

/// `selected` is 1-based; out-of-range values mark nothing.
pub fn suggestion_nodes(suggestions: &[Suggestion], selected: usize) -> Vec<Node> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let chosen = i + 1 == selected;
            Node::new("li")
                .attr("role", "option")
                .attr("id", if chosen { SELECTED_ID } else { "" })
                .attr("aria-selected", if chosen { "true" } else { "false" })
                .text(s.title.clone())
        })
        .collect()
}

pub fn history_nodes(entries: &[HistoryEntry]) -> Vec<Node> {
    entries
        .iter()
        .map(|e| {
            let inner = Node::new("div")
                .attr("class", "inner")
                .child(Node::new("time").text(e.timestamp.clone()))
                .child(Node::new("h6").text(e.title.clone()))
                .child(
                    Node::new("button")
                        .attr("aria-label", format!("Delete {} history entry", e.title))
                        .child(Node::new("span").text("X")),
                );
            Node::new("li").attr("class", "historyItem").child(inner)
        })
        .collect()
}

pub fn set_expanded<S: Surface + ?Sized>(surface: &mut S, expanded: bool) {
    let v = if expanded { "true" } else { "false" };
    surface.set_attribute(Element::SearchContainer, "aria-haspopup", v);
    surface.set_attribute(Element::SearchContainer, "aria-expanded", v);
    surface.set_attribute(Element::SuggestionsList, "aria-expanded", v);
}

pub fn render_suggestions<S: Surface + ?Sized>(
    surface: &mut S,
    suggestions: &[Suggestion],
    selected: usize,
) {
    if suggestions.is_empty() {
        set_expanded(surface, false);
        surface.replace_children(Element::SuggestionsList, Vec::new());
        surface.remove_attribute(Element::SearchField, "aria-activedescendant");
        return;
    }
    set_expanded(surface, true);
    surface.replace_children(
        Element::SuggestionsList,
        suggestion_nodes(suggestions, selected),
    );
    surface.set_attribute(Element::SearchField, "aria-activedescendant", SELECTED_ID);
}

pub fn announce<S: Surface + ?Sized>(surface: &mut S, count: usize) {
    surface.set_text(Element::LiveRegion, &announcement(count));
}

pub fn render_history<S: Surface + ?Sized>(surface: &mut S, entries: &[HistoryEntry]) {
    surface.set_hidden(Element::HistoryPanel, entries.is_empty());
    surface.replace_children(Element::HistoryList, history_nodes(entries));
}
