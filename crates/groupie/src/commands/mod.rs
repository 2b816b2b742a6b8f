//! CLI command implementations.

mod language;
pub(crate) mod render;
pub(crate) mod show;
pub(crate) mod strings;
mod view;

pub(crate) use render::RenderArgs;
pub(crate) use show::ShowArgs;
pub(crate) use strings::StringsArgs;
