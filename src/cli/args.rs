//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

use super::enums::ResolutionTier;
use crate::filename::{parse_filename_fields, FilenameFields};

/// Environment variable consulted when `--token` is not given.
pub const TOKEN_ENV: &str = "DC_API_TOKEN";

/// Download every image capture of a Digital Collections item
#[derive(Parser, Debug)]
#[command(name = "dc-download")]
#[command(version, about = "Download image captures of a Digital Collections item", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Thumbnails of every capture, named <sortkey>.<imageid>.<uuid>.jpeg
    dc-download -t <token> -u <item-uuid>

    # 1600px images named by uuid only, into ./images
    dc-download -t <token> -u <item-uuid> -s q -f u -o images

FILENAME FIELDS (-f):
    p    page sort key
    i    image id
    u    capture uuid
    Selected fields are always joined in the order p, i, u.")]
pub struct Args {
    /// Digital Collections API access token, see http://api.repo.nypl.org/
    #[arg(short, long, env = "DC_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// UUID of the item whose captures will be downloaded
    #[arg(short, long)]
    pub uuid: String,

    /// Size/type of images to be downloaded
    #[arg(short, long, default_value = "b")]
    pub size: ResolutionTier,

    /// Fields used to build filenames of downloaded files
    #[arg(short, long, default_value = "piu", value_parser = parse_filename_fields)]
    pub filename: FilenameFields,

    /// Output directory (must already exist)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Config file path (default: <config dir>/dc-download/config.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}
