use ratatui::layout::Rect;

use crate::DashboardError;

/// Geometry of the five dashboard panes.
///
/// The left 60% of the screen holds the log (90% of the height) above the
/// progress bar. The right 40% holds the task list on top and the stats and
/// info panes side by side underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub log: Rect,
    pub progress: Rect,
    pub tasks: Rect,
    pub stats: Rect,
    pub info: Rect,
}

pub fn compute_layout(width: u16, height: u16) -> Result<PaneLayout, DashboardError> {
    if width == 0 || height == 0 {
        return Err(DashboardError::invalid(format!(
            "terminal size {width}x{height} has no room for panes"
        )));
    }

    let left_width = scale(width, 6, 10);
    let right_width = width - left_width;
    let stats_width = right_width / 2;
    let info_width = right_width - stats_width;

    let log_height = scale(height, 9, 10);
    let progress_height = height - log_height;
    let tasks_height = height / 2;
    let bottom_height = height - tasks_height;

    Ok(PaneLayout {
        log: Rect::new(0, 0, left_width, log_height),
        progress: Rect::new(0, log_height, left_width, progress_height),
        tasks: Rect::new(left_width, 0, right_width, tasks_height),
        stats: Rect::new(left_width, tasks_height, stats_width, bottom_height),
        info: Rect::new(
            left_width + stats_width,
            tasks_height,
            info_width,
            bottom_height,
        ),
    })
}

fn scale(value: u16, numerator: u32, denominator: u32) -> u16 {
    (u32::from(value) * numerator / denominator) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_80_by_24() {
        let layout = compute_layout(80, 24).expect("layout");
        assert_eq!(layout.log, Rect::new(0, 0, 48, 21));
        assert_eq!(layout.progress, Rect::new(0, 21, 48, 3));
        assert_eq!(layout.tasks, Rect::new(48, 0, 32, 12));
        assert_eq!(layout.stats, Rect::new(48, 12, 16, 12));
        assert_eq!(layout.info, Rect::new(64, 12, 16, 12));
    }

    #[test]
    fn splits_120_by_40() {
        let layout = compute_layout(120, 40).expect("layout");
        assert_eq!(layout.log, Rect::new(0, 0, 72, 36));
        assert_eq!(layout.progress, Rect::new(0, 36, 72, 4));
        assert_eq!(layout.tasks, Rect::new(72, 0, 48, 20));
        assert_eq!(layout.stats, Rect::new(72, 20, 24, 20));
        assert_eq!(layout.info, Rect::new(96, 20, 24, 20));
    }

    #[test]
    fn panes_tile_the_screen() {
        for (width, height) in [(1, 1), (7, 3), (81, 25), (203, 61)] {
            let layout = compute_layout(width, height).expect("layout");
            let area: u32 = [
                layout.log,
                layout.progress,
                layout.tasks,
                layout.stats,
                layout.info,
            ]
            .iter()
            .map(|rect| u32::from(rect.width) * u32::from(rect.height))
            .sum();
            // Left and right columns each cover the full height once.
            assert_eq!(area, u32::from(width) * u32::from(height));
            let screen = Rect::new(0, 0, width, height);
            assert_eq!(layout.info.union(layout.log), screen);
        }
    }

    #[test]
    fn rejects_empty_terminal() {
        assert!(matches!(
            compute_layout(0, 24),
            Err(DashboardError::InvalidConfiguration(_))
        ));
        assert!(compute_layout(80, 0).is_err());
    }
}
