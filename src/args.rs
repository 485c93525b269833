use crate::{hex::HexBytes, stage::DEFAULT_STAGING_DIR};
use argh::FromArgs;
use serde::Deserialize;
use std::path::PathBuf;

/// Decode IPMI FRU images and publish their contents as inventory objects.
#[derive(FromArgs)]
pub struct TopLevel {
    /// more detailed log output, repeat for even more detail, e.g. -vv.
    #[argh(switch, short = 'v')]
    pub verbose: u8,
    #[argh(subcommand)]
    pub invocation: Invocation,
}

/// Inner top-level command.
#[derive(FromArgs, Deserialize)]
#[argh(subcommand)]
#[serde(rename_all = "snake_case")]
pub enum Invocation {
    #[serde(skip)]
    Run(Run),
    Show(Show),
    Publish(Publish),
    Stage(Stage),
}

/// Take run parameters from a specified YAML configuration file.
#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
pub struct Run {
    #[argh(positional)]
    pub config: PathBuf,
}

/// Decode a FRU image and print its areas, fields and records.
#[derive(FromArgs, Deserialize, Debug)]
#[argh(subcommand, name = "show")]
pub struct Show {
    /// path to the EEPROM device or an image file.
    #[argh(positional)]
    pub eeprom: PathBuf,
}

/// Decode a FRU image and print the inventory objects configured for it.
#[derive(FromArgs, Deserialize, Debug)]
#[argh(subcommand, name = "publish")]
pub struct Publish {
    /// path to the EEPROM device or an image file.
    #[argh(positional)]
    pub eeprom: PathBuf,
    /// FRU id to look up in the inventory configuration.
    #[argh(option, short = 'f')]
    pub fruid: u8,
    /// YAML inventory configuration mapping FRU values to objects.
    #[argh(option, short = 'c')]
    pub config: PathBuf,
}

/// Write FRU data at an offset into the staging file of a FRU, then
/// validate the staged image.
#[derive(FromArgs, Deserialize, Debug)]
#[argh(subcommand, name = "stage")]
pub struct Stage {
    /// FRU id, selects the staging file ipmifru<id>.
    #[argh(option, short = 'f')]
    pub fruid: u8,
    /// byte offset into the FRU image to write at.
    #[argh(option, short = 'o', default = "0")]
    #[serde(default)]
    pub offset: u16,
    /// bytes to write as hex digits, e.g. 0100000100000000fe.
    #[argh(option, short = 'd')]
    pub data: HexBytes,
    /// directory holding the staging files, /tmp by default.
    #[argh(option, default = "default_staging_dir()")]
    #[serde(default = "default_staging_dir")]
    pub dir: PathBuf,
    /// optional inventory configuration, publishes the staged FRU if valid.
    #[argh(option, short = 'c')]
    #[serde(default)]
    pub config: Option<PathBuf>,
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STAGING_DIR)
}
