use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Filter bar, table and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filter bar
                Constraint::Min(1),    // Table
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Rectangle of at most `width` x `height` centered in `area`
    pub fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }

    /// Slot `index` of the toast stack in the top-right corner
    pub fn toast(area: Rect, index: u16, width: u16) -> Option<Rect> {
        const HEIGHT: u16 = 3;
        let width = width.min(area.width.saturating_sub(2));
        let y = area.y + 1 + index * HEIGHT;
        if y + HEIGHT > area.y + area.height {
            return None;
        }
        let x = area.x + area.width.saturating_sub(width + 1);
        Some(Rect::new(x, y, width, HEIGHT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(Layout::popup(area, 50, 10), Rect::new(25, 15, 50, 10));

        let small = Rect::new(0, 0, 20, 6);
        let popup = Layout::popup(small, 50, 10);
        assert_eq!((popup.width, popup.height), (16, 4));
    }

    #[test]
    fn test_toast_stack_stops_at_bottom() {
        let area = Rect::new(0, 0, 80, 10);
        assert_eq!(Layout::toast(area, 0, 40), Some(Rect::new(39, 1, 40, 3)));
        assert!(Layout::toast(area, 2, 40).is_some());
        assert!(Layout::toast(area, 3, 40).is_none());
    }
}
