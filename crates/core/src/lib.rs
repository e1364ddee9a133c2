mod apply;
mod config;
mod exif_reader;
mod exiftool;
mod metadata;
mod ordering;
mod planner;
mod resolver;
mod scan;
mod timestamp;

pub use apply::{apply_plan, plan_and_apply, RenameMode, RenameOutcome, RenameReport, RenameResult};
pub use config::{app_paths, load_config, load_config_from, AppConfig, AppPaths, Extractor};
pub use exif_reader::EmbeddedExifReader;
pub use exiftool::{ExifToolReader, DEFAULT_TIMESTAMP_FIELDS};
pub use metadata::{MediaRecord, MetadataReader, TimestampSource};
pub use ordering::order_records;
pub use planner::{
    destination_name, plan_renames, sequence_width, validate_base_name, PlanError, RenameEntry,
    RenamePlan,
};
pub use resolver::{resolve_timestamp, Resolution};
pub use scan::{
    discover_media_files, file_modified_millis, is_media_file, scan_directory, scan_media,
    ScannedMedia, MEDIA_EXTENSIONS,
};
pub use timestamp::{parse_instant, parse_timestamp, ParsedTimestamp, TimestampError, TIMESTAMP_PROFILE};
