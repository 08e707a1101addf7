//! Selectable list with optional check marks and filtering
//!
//! The cursor always indexes the *visible* items (after filtering). It is
//! clamped to `0..len` and only `None` when nothing is visible.

use super::{Render, truncate};
use crate::theme::Styles;
use ratatui::text::{Line, Span, Text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub description: String,
    /// `Some` for checkable items
    pub checked: Option<bool>,
}

impl ListItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            checked: None,
        }
    }

    pub fn checkable(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.title.to_lowercase().contains(&filter)
            || self.description.to_lowercase().contains(&filter)
    }
}

#[derive(Debug, Clone, Default)]
pub struct List {
    title: String,
    items: Vec<ListItem>,
    /// Indices into `items` currently shown
    visible: Vec<usize>,
    cursor: usize,
    offset: usize,
    focused: bool,
    filtering_enabled: bool,
    filter: String,
    width: u16,
    height: u16,
}

impl List {
    pub fn new(title: impl Into<String>, items: Vec<ListItem>) -> Self {
        let mut list = Self {
            title: title.into(),
            filtering_enabled: true,
            ..Self::default()
        };
        list.set_items(items);
        list
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Number of visible items
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Replace the items, keeping the cursor where possible
    pub fn set_items(&mut self, items: Vec<ListItem>) {
        self.items = items;
        self.refilter();
    }

    /// Visible cursor position, `None` only when nothing is visible
    pub fn index(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Index into [`List::items`] of the item under the cursor
    pub fn selected_index(&self) -> Option<usize> {
        self.index().map(|i| self.visible[i])
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.selected_index().map(|i| &self.items[i])
    }

    /// Move the cursor to visible position `index`, clamped
    pub fn select(&mut self, index: usize) {
        if self.visible.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = index.min(self.visible.len() - 1);
        self.scroll_into_view();
    }

    pub fn cursor_up(&mut self) {
        self.select(self.cursor.saturating_sub(1));
    }

    pub fn cursor_down(&mut self) {
        self.select(self.cursor.saturating_add(1));
    }

    pub fn page_up(&mut self) {
        self.select(self.cursor.saturating_sub(self.page_size()));
    }

    pub fn page_down(&mut self) {
        self.select(self.cursor.saturating_add(self.page_size()));
    }

    pub fn go_to_start(&mut self) {
        self.select(0);
    }

    pub fn go_to_end(&mut self) {
        self.select(usize::MAX);
    }

    /// Flip the check mark of the item under the cursor; no-op for plain items
    pub fn toggle_selected(&mut self) {
        if let Some(i) = self.selected_index() {
            if let Some(checked) = self.items[i].checked.as_mut() {
                *checked = !*checked;
            }
        }
    }

    /// Checked items in original order
    pub fn checked_items(&self) -> Vec<&ListItem> {
        self.items
            .iter()
            .filter(|item| item.checked == Some(true))
            .collect()
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn filtering_enabled(&self) -> bool {
        self.filtering_enabled
    }

    /// Turning filtering off also clears any active filter
    pub fn set_filtering_enabled(&mut self, enabled: bool) {
        self.filtering_enabled = enabled;
        if !enabled {
            self.clear_filter();
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    /// Show only items whose title or description contains `filter`
    /// (case-insensitive). Ignored while filtering is disabled.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        if !self.filtering_enabled {
            return;
        }
        self.filter = filter.into();
        self.refilter();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refilter();
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.scroll_into_view();
    }

    fn refilter(&mut self) {
        let previous = self.selected_index();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.filter.is_empty() || item.matches(&self.filter))
            .map(|(i, _)| i)
            .collect();

        // Keep the same item under the cursor if it survived the filter
        let cursor = previous
            .and_then(|prev| self.visible.iter().position(|&i| i == prev))
            .unwrap_or(self.cursor);
        self.offset = 0;
        self.select(cursor);
    }

    /// Rows available for items (title takes one)
    fn page_size(&self) -> usize {
        if self.height == 0 {
            usize::MAX
        } else {
            usize::from(self.height.saturating_sub(1)).max(1)
        }
    }

    fn scroll_into_view(&mut self) {
        let page = self.page_size();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if page != usize::MAX && self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
    }
}

impl Render for List {
    fn render(&self) -> Text<'static> {
        let mut lines = Vec::new();
        if !self.title.is_empty() {
            let mut title = vec![Span::styled(self.title.clone(), Styles::title())];
            if self.is_filtered() {
                title.push(Span::styled(
                    format!("  filter: {}", self.filter),
                    Styles::text_muted(),
                ));
            }
            lines.push(Line::from(title));
        }

        if self.visible.is_empty() {
            let empty = if self.is_filtered() {
                "No matching items"
            } else {
                "No items"
            };
            lines.push(Line::from(Span::styled(empty, Styles::text_muted())));
            return Text::from(lines);
        }

        let width = if self.width == 0 {
            usize::MAX
        } else {
            usize::from(self.width)
        };
        let page = self.page_size();
        for (pos, &item_idx) in self
            .visible
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(page)
        {
            let item = &self.items[item_idx];
            let is_cursor = pos == self.cursor;
            let marker = if is_cursor { "> " } else { "  " };
            let check = match item.checked {
                Some(true) => "[x] ",
                Some(false) => "[ ] ",
                None => "",
            };
            let mut row = format!("{marker}{check}{}", item.title);
            if !item.description.is_empty() {
                row.push_str(" - ");
                row.push_str(&item.description);
            }
            let style = match (is_cursor, self.focused) {
                (true, true) => Styles::selected(),
                (true, false) => Styles::selected_unfocused(),
                _ => Styles::text(),
            };
            lines.push(Line::from(Span::styled(truncate(&row, width), style)));
        }
        Text::from(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drivers() -> List {
        List::new(
            "Drivers",
            vec![
                ListItem::new("550", "Latest"),
                ListItem::new("535", "Production"),
                ListItem::new("470", "Legacy"),
            ],
        )
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        let mut list = List::new("Empty", vec![]);
        assert_eq!(list.index(), None);
        list.select(3);
        list.cursor_down();
        assert_eq!(list.index(), None);
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn test_select_clamps() {
        let mut list = drivers();
        assert_eq!(list.index(), Some(0));
        list.select(99);
        assert_eq!(list.index(), Some(2));
        list.cursor_down();
        assert_eq!(list.index(), Some(2));
        list.go_to_start();
        list.cursor_up();
        assert_eq!(list.index(), Some(0));
    }

    #[test]
    fn test_set_items_clamps_selection() {
        let mut list = drivers();
        list.go_to_end();
        list.set_items(vec![ListItem::new("550", "Latest")]);
        assert_eq!(list.index(), Some(0));

        list.set_items(vec![]);
        assert_eq!(list.index(), None);
    }

    #[test]
    fn test_filter_narrows_and_keeps_cursor_item() {
        let mut list = drivers();
        list.select(1);
        list.set_filter("PROD");
        assert_eq!(list.len(), 1);
        assert_eq!(list.selected_item().unwrap().title, "535");

        list.clear_filter();
        assert_eq!(list.len(), 3);
        assert_eq!(list.selected_item().unwrap().title, "535");
    }

    #[test]
    fn test_filter_with_no_match_renders_placeholder() {
        let mut list = drivers();
        list.set_filter("zzz");
        assert_eq!(list.index(), None);
        assert!(list.view().contains("No matching items"));
    }

    #[test]
    fn test_disabled_filtering_ignores_filter() {
        let mut list = drivers();
        list.set_filter("legacy");
        list.set_filtering_enabled(false);
        assert_eq!(list.len(), 3);
        list.set_filter("legacy");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_toggle_only_affects_checkable_items() {
        let mut list = List::new(
            "Components",
            vec![
                ListItem::new("cuda", "").checkable(false),
                ListItem::new("docs", ""),
            ],
        );
        list.toggle_selected();
        assert_eq!(list.checked_items().len(), 1);

        list.cursor_down();
        list.toggle_selected();
        assert_eq!(list.items()[1].checked, None);
    }

    #[test]
    fn test_render_marks_cursor_and_checks() {
        let mut list = List::new(
            "Components",
            vec![
                ListItem::new("cuda", "CUDA toolkit").checkable(true),
                ListItem::new("opencl", "").checkable(false),
            ],
        );
        list.focus();
        let view = list.view();
        assert!(view.contains("> [x] cuda - CUDA toolkit"));
        assert!(view.contains("  [ ] opencl"));
    }

    #[test]
    fn test_scrolls_to_keep_cursor_visible() {
        let items = (0..20).map(|i| ListItem::new(format!("item {i}"), "")).collect();
        let mut list = List::new("Many", items);
        list.set_size(40, 5);
        list.go_to_end();
        let view = list.view();
        assert!(view.contains("> item 19"));
        assert!(!view.lines().any(|line| line.trim() == "item 0"));
    }
}
