use anyhow::Result;
use roidb::{load_roidb, load_segdb, LabelKind};
use std::path::PathBuf;

fn write_fixture(name: &str, text: &str) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("roidb-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(name);
    std::fs::write(&path, text)?;
    Ok(path)
}

#[test]
fn load_roidb_file() -> Result<()> {
    let path = write_fixture(
        "roidb.json",
        r#"[
            { "image": "a.jpg", "boxes": [[0, 0, 10, 10], [5, 5, 20, 30]], "gt_classes": [1, 2] },
            { "image": "b.jpg", "flipped": true, "boxes": [] }
        ]"#,
    )?;
    let roidb = load_roidb(&path)?;

    assert_eq!(roidb.len(), 2);
    assert_eq!(roidb[0].num_boxes(), 2);
    assert_eq!(roidb[0].gt_classes, vec![1, 2]);
    assert!(roidb[1].flipped);
    assert_eq!(roidb[1].num_boxes(), 0);
    Ok(())
}

#[test]
fn load_inconsistent_roidb_file() -> Result<()> {
    let path = write_fixture(
        "bad_roidb.json",
        r#"[{ "image": "a.jpg", "boxes": [[0, 0, 10, 10]], "max_overlaps": [1.0, 0.5] }]"#,
    )?;
    assert!(load_roidb(&path).is_err());
    Ok(())
}

#[test]
fn load_segdb_file() -> Result<()> {
    let path = write_fixture(
        "segdb.json",
        r#"[{ "image": "a.jpg", "seg_cls_path": "a.png" }]"#,
    )?;
    let segdb = load_segdb(&path)?;
    assert_eq!(segdb[0].seg_cls_path, PathBuf::from("a.png"));
    assert_eq!(LabelKind::from(0), LabelKind::Background);
    Ok(())
}
