use petri_lib::model::config::{AppConfig, SeedConfig};
use petri_lib::model::pattern::Pattern;
use std::path::Path;

fn repo_path(relative: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_default_config_file_is_valid() {
    let config = AppConfig::load(repo_path("cfg.toml")).unwrap();
    assert_eq!(config.dish.width, 120);
    assert_eq!(config.run.total_generations(), 420);
    assert!(matches!(config.seeding, SeedConfig::Noise { .. }));
}

#[test]
fn test_bundled_patterns_parse() {
    let dir = repo_path("patterns");
    for (name, cells) in [("glider", 5), ("r-pentomino", 5), ("acorn", 7), ("gosper-gun", 36)] {
        let path = Pattern::resolve(&dir, name).unwrap();
        let pattern = Pattern::from_file(&path).unwrap();
        assert_eq!(pattern.cells().len(), cells, "cell count for {name}");
    }
}

#[test]
fn test_gun_declares_its_rule() {
    let path = Pattern::resolve(repo_path("patterns"), "gosper-gun").unwrap();
    let pattern = Pattern::from_file(path).unwrap();
    assert_eq!(pattern.rule(), Some("B3/S23"));
    assert_eq!((pattern.width(), pattern.height()), (36, 9));
}
