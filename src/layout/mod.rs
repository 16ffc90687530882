//! Layout core: measurement, wrapping, style resolution, and pagination.
//!
//! These are the four reusable capabilities every output format shares:
//!
//! - [`wrap`] fits paragraph text to a width using an injected measurement
//! - [`resolve_style`] maps a block to its [`StyleId`](crate::model::StyleId)
//! - [`Paginator`] assigns lines to pages and vertical positions
//! - [`TextMeasurer`] is the seam for font metrics

mod measure;
mod paginate;
mod style;
mod wrap;

pub use measure::{checked_measure, FontFileMeasurer, HeuristicMeasurer, TextMeasurer};
pub use paginate::{paginate, Paginator, PaginatorState};
pub use style::resolve_style;
pub use wrap::{wrap, wrap_with_report, Wrapped};
