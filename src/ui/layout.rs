use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_WIDTH: u16 = 34;

pub struct AppLayout {
    pub tabs_area: Rect,
    pub body_area: Rect,
    pub status_area: Rect,
}

pub struct RevisionLayout {
    pub sidebar_area: Option<Rect>,
    pub content_area: Rect,
}

pub struct ChatLayout {
    pub messages_area: Rect,
    pub attachments_area: Rect,
    pub input_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_app_chunks(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    AppLayout {
        tabs_area: chunks[0],
        body_area: chunks[1],
        status_area: chunks[2],
    }
}

/// Chapter list on the left when the sidebar is open, or too wide to matter.
pub fn calculate_revision_chunks(area: Rect, sidebar_open: bool) -> RevisionLayout {
    if !sidebar_open || area.width < SIDEBAR_WIDTH * 2 {
        return RevisionLayout {
            sidebar_area: None,
            content_area: area,
        };
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(area);

    RevisionLayout {
        sidebar_area: Some(chunks[0]),
        content_area: chunks[1],
    }
}

/// Vertical split of the chat drawer. The attachment row collapses when
/// nothing is pending.
pub fn calculate_chat_chunks(area: Rect, has_attachments: bool) -> ChatLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(if has_attachments { 1 } else { 0 }),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    ChatLayout {
        messages_area: chunks[0],
        attachments_area: chunks[1],
        input_area: chunks[2],
        help_area: chunks[3],
    }
}

/// Right-hand drawer covering `percent_x` of the width, full height.
pub fn drawer_rect(percent_x: u16, area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100 - percent_x),
            Constraint::Percentage(percent_x),
        ])
        .split(area)[1]
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout() {
        let layout = calculate_app_chunks(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.tabs_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.body_area.height, 36);
        assert_eq!(layout.status_area.y, 39);
    }

    #[test]
    fn test_revision_layout_with_sidebar() {
        let layout = calculate_revision_chunks(Rect::new(0, 0, 120, 30), true);
        assert_eq!(layout.sidebar_area.map(|a| a.width), Some(SIDEBAR_WIDTH));
        assert_eq!(layout.content_area.width, 120 - SIDEBAR_WIDTH);
    }

    #[test]
    fn test_revision_layout_collapses_sidebar() {
        let closed = calculate_revision_chunks(Rect::new(0, 0, 120, 30), false);
        assert!(closed.sidebar_area.is_none());
        assert_eq!(closed.content_area.width, 120);

        let narrow = calculate_revision_chunks(Rect::new(0, 0, 50, 30), true);
        assert!(narrow.sidebar_area.is_none());
    }

    #[test]
    fn test_chat_layout() {
        let area = Rect::new(0, 0, 60, 40);
        let with = calculate_chat_chunks(area, true);
        assert_eq!(with.attachments_area.height, 1);
        assert_eq!(with.input_area.height, 3);
        assert_eq!(with.messages_area.height, 35);

        let without = calculate_chat_chunks(area, false);
        assert_eq!(without.attachments_area.height, 0);
        assert_eq!(without.messages_area.height, 36);
    }

    #[test]
    fn test_drawer_rect_hugs_right_edge() {
        let area = Rect::new(0, 0, 100, 30);
        let drawer = drawer_rect(45, area);
        assert_eq!(drawer.x + drawer.width, 100);
        assert_eq!(drawer.height, 30);
        assert_eq!(drawer.width, 45);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(50, 20, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 20);
    }
}
