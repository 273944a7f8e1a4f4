use lcsts_launcher::flags::trainer_args;
use lcsts_launcher::{LaunchArgs, LaunchPlan, TrainConfig};

fn fixture() -> Vec<String> {
    include_str!("fixtures/lcsts_char.args")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_builtin_args_match_fixture() {
    assert_eq!(trainer_args(&TrainConfig::lcsts_char()), fixture());
}

#[test]
fn test_plan_passes_fixture_after_script() {
    let plan = LaunchPlan::new(TrainConfig::lcsts_char(), &LaunchArgs::default());
    let mut expected = vec!["train.py".to_string()];
    expected.extend(fixture());
    assert_eq!(plan.args(), expected.as_slice());
}

#[test]
fn test_json_config_renders_same_args() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lcsts_char.json");
    TrainConfig::lcsts_char().save(&path)?;

    let loaded = TrainConfig::resolve(Some(path.as_path()))?;
    assert_eq!(trainer_args(&loaded), fixture());
    Ok(())
}
