use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Overlay size as a share of the whole screen
const OVERLAY_PERCENT_X: u16 = 80;
const OVERLAY_PERCENT_Y: u16 = 80;

/// Split-pane layout configuration
pub struct AppLayout {
    pub header_area: Rect,
    pub list_area: Rect,
    pub preview_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create split-pane layout:
    /// - Header: breadcrumb and search input (3 rows, bordered)
    /// - List: 60% width (left)
    /// - Preview pane: 40% width (right)
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Main area (at least 3 rows)
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(vertical_chunks[1]);

        Self {
            header_area: vertical_chunks[0],
            list_area: horizontal_chunks[0],
            preview_area: horizontal_chunks[1],
            status_area: vertical_chunks[2],
        }
    }
}

/// Centered popup area for the detail overlay
pub fn overlay_area(area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(OVERLAY_PERCENT_Y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(OVERLAY_PERCENT_X)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Rows visible inside a bordered list of the given area
pub fn visible_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(2)).max(1)
}
