mod dump;

use anyhow::{Context, Result};
use clap::Parser;
use fpn_config::Config;
use fpn_image::{get_crop_image, get_image, get_segmentation_image};
use fpn_metric::{MetricSet, Stage, TensorBundle};
use log::{debug, info};
use prettytable::{cell, row, Table};
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
/// Inspect configurations, preprocessing and metrics of detector training.
enum Opts {
    /// Print the tensor names expected by the metrics.
    Names {
        /// configuration file
        config_file: PathBuf,
    },
    /// Preprocess a roidb and summarize the network inputs.
    Preprocess {
        /// configuration file
        config_file: PathBuf,
        /// roidb JSON file
        roidb_file: PathBuf,
        /// cut images into overlapping tiles
        #[clap(long)]
        crop: bool,
        /// seed of the scale selection
        #[clap(long, default_value = "0")]
        seed: u64,
    },
    /// Preprocess a segdb and summarize the network inputs.
    PreprocessSeg {
        /// configuration file
        config_file: PathBuf,
        /// segdb JSON file
        segdb_file: PathBuf,
        /// seed of the scale selection
        #[clap(long, default_value = "0")]
        seed: u64,
    },
    /// Evaluate dumped network outputs.
    Eval {
        /// configuration file
        config_file: PathBuf,
        /// JSON file with a list of {labels, preds} batches
        dump_file: PathBuf,
        /// sub-network of the outputs, rpn or rcnn
        #[clap(long, default_value = "rcnn")]
        stage: Stage,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Names { config_file } => names(config_file)?,
        Opts::Preprocess {
            config_file,
            roidb_file,
            crop,
            seed,
        } => preprocess(config_file, roidb_file, crop, seed)?,
        Opts::PreprocessSeg {
            config_file,
            segdb_file,
            seed,
        } => preprocess_seg(config_file, segdb_file, seed)?,
        Opts::Eval {
            config_file,
            dump_file,
            stage,
        } => eval(config_file, dump_file, stage)?,
    }

    Ok(())
}

fn names(config_file: impl AsRef<Path>) -> Result<()> {
    let config = Config::open(config_file)?;
    let join = |names: &[fpn_metric::TensorName]| {
        names
            .iter()
            .map(|name| name.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = Table::new();
    table.add_row(row!["stage", "predictions", "labels"]);

    for stage in [Stage::Rpn, Stage::Rcnn] {
        let (pred_names, label_names) = stage.names(&config.train);
        table.add_row(row![stage, join(&pred_names), join(&label_names)]);
    }

    table.printstd();
    Ok(())
}

fn preprocess(
    config_file: impl AsRef<Path>,
    roidb_file: impl AsRef<Path>,
    crop: bool,
    seed: u64,
) -> Result<()> {
    let config = Config::open(config_file)?;
    let roidb = roidb::load_roidb(roidb_file)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let (images, records) = if crop {
        get_crop_image(&roidb, &config, &mut rng)?
    } else {
        get_image(&roidb, &config, &mut rng)?
    };
    info!("preprocessed {} images", images.len());

    let mut table = Table::new();
    table.add_row(row!["image", "tensor shape", "scale", "boxes"]);

    for (image, record) in images.iter().zip(&records) {
        let scale = record
            .im_info
            .map(|im_info| format!("{:.4}", im_info.scale))
            .unwrap_or_default();
        table.add_row(row![
            record.image.display(),
            format!("{:?}", image.shape()),
            scale,
            record.num_boxes(),
        ]);
    }

    table.printstd();
    Ok(())
}

fn preprocess_seg(
    config_file: impl AsRef<Path>,
    segdb_file: impl AsRef<Path>,
    seed: u64,
) -> Result<()> {
    let config = Config::open(config_file)?;
    let segdb = roidb::load_segdb(segdb_file)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let (images, label_maps, records) = get_segmentation_image(&segdb, &config, &mut rng)?;
    info!("preprocessed {} images", images.len());

    let mut table = Table::new();
    table.add_row(row!["image", "tensor shape", "class map shape"]);

    for ((image, label_map), record) in images.iter().zip(&label_maps).zip(&records) {
        table.add_row(row![
            record.image.display(),
            format!("{:?}", image.shape()),
            format!("{:?}", label_map.shape()),
        ]);
    }

    table.printstd();
    Ok(())
}

fn eval(config_file: impl AsRef<Path>, dump_file: impl AsRef<Path>, stage: Stage) -> Result<()> {
    let config = Config::open(config_file)?;
    let batches = dump::load_dump(dump_file)?;
    let (pred_names, label_names) = stage.names(&config.train);
    let mut metrics = MetricSet::for_stage(stage, &config.train);

    for (index, batch) in batches.iter().enumerate() {
        let labels = TensorBundle::new(label_names.clone(), dump::to_arrays(&batch.labels)?)
            .with_context(|| format!("invalid labels in batch {}", index))?;
        let preds = TensorBundle::new(pred_names.clone(), dump::to_arrays(&batch.preds)?)
            .with_context(|| format!("invalid predictions in batch {}", index))?;

        metrics
            .update(&labels, &preds)
            .with_context(|| format!("failed to evaluate batch {}", index))?;
        debug!("batch {}: {}", index, metrics);
    }
    info!("evaluated {} batches", batches.len());

    let mut table = Table::new();
    table.add_row(row!["metric", "value"]);

    for (name, value) in metrics.get_all() {
        let value = value
            .map(|value| format!("{:.6}", value))
            .unwrap_or_else(|| "n/a".into());
        table.add_row(row![name, value]);
    }

    table.printstd();
    Ok(())
}
