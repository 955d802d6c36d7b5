mod helpers;
mod merge;
mod plan;
mod validate;

pub(crate) use merge::{cmd_merge_recipes, cmd_merge_views};
pub(crate) use plan::cmd_plan;
pub(crate) use validate::{cmd_validate_recipes, cmd_validate_views};
