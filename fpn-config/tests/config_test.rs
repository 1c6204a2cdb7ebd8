use anyhow::Result;
use fpn_config::Config;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: &[&str] = &["fpn_dcn_coco.json5", "rcnn_alternate.json5"];

lazy_static::lazy_static! {
    static ref CONFIG_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cfg");
    static ref CONFIG_FILES: Vec<PathBuf> = {
        CONFIG_FILE_NAMES.iter().map(|file_name| CONFIG_DIR.join(file_name)).collect()
    };
}

#[test]
fn config_files_test() -> Result<()> {
    CONFIG_FILES.iter().try_for_each(|path| -> Result<_> {
        let config = Config::open(path)?;
        config.validate()?;
        Ok(())
    })?;
    Ok(())
}

#[test]
fn end2end_config_test() -> Result<()> {
    let config = Config::open(CONFIG_DIR.join("fpn_dcn_coco.json5"))?;
    assert!(config.train.end2end && config.train.enable_ohem);
    assert_eq!(config.scales, vec![(800, 1280), (600, 1000)]);
    assert_eq!(config.network.image_stride, 32);
    Ok(())
}

#[test]
fn missing_config_file_test() {
    assert!(Config::open(CONFIG_DIR.join("no_such_file.json5")).is_err());
}
