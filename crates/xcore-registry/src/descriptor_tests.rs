use super::*;
use std::io::Write;
use tempfile::tempdir;

fn plugin_dir(info_body: &str) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let mut f = std::fs::File::create(dir.path().join("info")).unwrap();
    write!(f, "{info_body}").unwrap();
    dir
}

#[test]
fn loads_valid_descriptor() {
    let dir = plugin_dir("name = rbd\nid = 3\nexec = rbd-plugin\n");
    let d = Descriptor::load(dir.path()).unwrap();
    assert_eq!(d.name, "rbd");
    assert_eq!(d.id, 3);
    assert_eq!(d.exec_path(), dir.path().join("rbd-plugin"));
}

#[test]
fn empty_name_is_rejected() {
    let dir = plugin_dir("name = \nid = 1\nexec = x\n");
    assert!(matches!(
        Descriptor::load(dir.path()),
        Err(DescriptorError::MissingField(_, "name"))
    ));
}

#[test]
fn negative_id_is_rejected() {
    let dir = plugin_dir("name = rbd\nid = -1\nexec = x\n");
    assert!(matches!(
        Descriptor::load(dir.path()),
        Err(DescriptorError::InvalidId(_))
    ));
}

#[test]
fn missing_info_file_errors() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Descriptor::load(dir.path()),
        Err(DescriptorError::Load(_, _))
    ));
}
