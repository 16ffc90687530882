//! Line-to-page assignment.

use log::trace;

use crate::error::Result;
use crate::model::{Page, PageGeometry, StyledLine};

/// Paginator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// The current page can take another line
    Accumulating,
    /// The next line must start a new page
    PageFull,
}

/// Assigns styled lines to pages and vertical positions.
///
/// A line fits while its position stays at or above
/// `height - bottom_margin`; positions advance by `leading` from
/// `top_margin`. The paginator is the only owner of the cursor.
#[derive(Debug)]
pub struct Paginator {
    geometry: PageGeometry,
    state: PaginatorState,
    page: Page,
    lines_on_page: u32,
    finished: Vec<Page>,
}

impl Paginator {
    /// Create a paginator, validating the geometry first.
    pub fn new(geometry: PageGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            state: PaginatorState::Accumulating,
            page: Page::new(1),
            lines_on_page: 0,
            finished: Vec::new(),
        })
    }

    /// Current state.
    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// Number of the page being filled.
    pub fn current_page(&self) -> u32 {
        self.page.number
    }

    /// Position the next line would take on the current page.
    pub fn cursor(&self) -> f32 {
        self.position(self.lines_on_page)
    }

    // Computed from the line index so long pages do not accumulate rounding error.
    fn position(&self, index: u32) -> f32 {
        self.geometry.top_margin + index as f32 * self.geometry.leading
    }

    /// Place one line, breaking the page first if it is full.
    pub fn push(&mut self, line: StyledLine) {
        if self.state == PaginatorState::PageFull {
            self.start_next_page();
        }

        let y = self.cursor();
        self.page.place(line, y);
        self.lines_on_page += 1;

        if self.cursor() > self.geometry.content_bottom() {
            self.state = PaginatorState::PageFull;
        }
    }

    fn start_next_page(&mut self) {
        let next = Page::new(self.page.number + 1);
        let done = std::mem::replace(&mut self.page, next);
        trace!("page {} finalized with {} lines", done.number, done.lines.len());
        self.finished.push(done);
        self.lines_on_page = 0;
        self.state = PaginatorState::Accumulating;
    }

    /// Finalize the last page and return every page.
    ///
    /// Empty pages and trailing pages that hold only spacer advances are
    /// not emitted.
    pub fn finish(mut self) -> Vec<Page> {
        if !self.page.is_empty() {
            self.finished.push(self.page);
        }
        while self
            .finished
            .last()
            .is_some_and(|page| !page.has_drawable_lines())
        {
            self.finished.pop();
        }
        self.finished
    }
}

/// Paginate a complete line stream.
pub fn paginate<I>(lines: I, geometry: &PageGeometry) -> Result<Vec<Page>>
where
    I: IntoIterator<Item = StyledLine>,
{
    let mut paginator = Paginator::new(*geometry)?;
    for line in lines {
        paginator.push(line);
    }
    Ok(paginator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::StyleId;

    fn body(n: usize) -> Vec<StyledLine> {
        (0..n)
            .map(|i| StyledLine::new(format!("line {}", i), StyleId::Body, i))
            .collect()
    }

    fn small() -> PageGeometry {
        PageGeometry::new(100.0, 100.0, 10.0, 10.0, 10.0, 20.0)
    }

    #[test]
    fn test_worked_example() {
        let pages = paginate(body(6), &small()).unwrap();
        assert_eq!(pages.len(), 2);

        let ys: Vec<f32> = pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![10.0, 30.0, 50.0, 70.0, 90.0]);

        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].lines.len(), 1);
        assert_eq!(pages[1].lines[0].y, 10.0);
        assert_eq!(pages[1].lines[0].line.text, "line 5");
    }

    #[test]
    fn test_exactly_full_page_has_no_trailing_page() {
        let pages = paginate(body(5), &small()).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_state_machine() {
        let mut p = Paginator::new(small()).unwrap();
        assert_eq!(p.state(), PaginatorState::Accumulating);
        assert_eq!(p.cursor(), 10.0);

        for line in body(4) {
            p.push(line);
        }
        assert_eq!(p.state(), PaginatorState::Accumulating);
        assert_eq!(p.cursor(), 90.0);

        p.push(StyledLine::new("fifth", StyleId::Body, 4));
        assert_eq!(p.state(), PaginatorState::PageFull);
        assert_eq!(p.current_page(), 1);

        p.push(StyledLine::new("sixth", StyleId::Body, 5));
        assert_eq!(p.state(), PaginatorState::Accumulating);
        assert_eq!(p.current_page(), 2);
        assert_eq!(p.cursor(), 30.0);
    }

    #[test]
    fn test_every_line_on_exactly_one_page() {
        let geometry = PageGeometry::letter();
        let pages = paginate(body(500), &geometry).unwrap();

        let total: usize = pages.iter().map(|p| p.lines.len()).sum();
        assert_eq!(total, 500);

        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i as u32 + 1);
            for placed in &page.lines {
                assert!(placed.y >= geometry.top_margin);
                assert!(placed.y <= geometry.content_bottom());
            }
        }

        let order: Vec<usize> = pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.line.source_block_index))
            .collect();
        assert_eq!(order, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input_has_no_pages() {
        let pages = paginate(Vec::new(), &PageGeometry::letter()).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_spacers_advance_the_cursor() {
        let lines = vec![
            StyledLine::new("a", StyleId::Body, 0),
            StyledLine::spacer(1),
            StyledLine::new("b", StyleId::Body, 2),
        ];
        let pages = paginate(lines, &small()).unwrap();
        let ys: Vec<f32> = pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![10.0, 30.0, 50.0]);
    }

    #[test]
    fn test_trailing_spacer_only_page_is_dropped() {
        let mut lines = body(5);
        lines.push(StyledLine::spacer(5));
        lines.push(StyledLine::spacer(6));
        let pages = paginate(lines, &small()).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_invalid_geometry_fails_before_paginating() {
        let geometry = small().with_leading(0.0);
        let result = paginate(body(1), &geometry);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
