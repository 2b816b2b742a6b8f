//! `groupie render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use groupie_detail::Entity;

use super::view::ViewArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Artist JSON file, or `-` to read stdin.
    input: PathBuf,

    #[command(flatten)]
    pub view: ViewArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input is not a JSON
    /// object.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.view.open(&output)?;

        let entity = Entity::from_json(&read_input(&self.input)?)?;
        session.present(&entity, &output).await
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    Ok(std::fs::read_to_string(path)?)
}
