//! Forward projection of NAV at a locked-in after-fee return

mod locked_in;

pub use locked_in::{
    project_locked_in, project_locked_in_from, ProjectionResult, PROJECTION_LABEL,
};
