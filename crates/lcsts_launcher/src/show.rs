use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::config::TrainConfig;
use crate::launcher::{LaunchArgs, LaunchPlan};

#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Print the record as JSON instead of the argument vector
    #[arg(long, action)]
    pub json: bool,
}

/// Lines printed by `show`: the pretty JSON record, or the script
/// followed by one trainer argument per line.
pub fn render(args: &ShowArgs) -> Result<String> {
    let config = TrainConfig::resolve(args.launch.config.as_deref())?;
    if args.json {
        return Ok(serde_json::to_string_pretty(&config)?);
    }
    let plan = LaunchPlan::new(config, &args.launch);
    Ok(plan.args().join("\n"))
}

pub fn run(args: ShowArgs) -> Result<ExitCode> {
    println!("{}", render(&args)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::trainer_args;

    #[test]
    fn test_show_args_after_script() -> Result<()> {
        let args = ShowArgs {
            launch: LaunchArgs {
                script: "scripts/train.py".to_string(),
                ..LaunchArgs::default()
            },
            json: false,
        };
        let text = render(&args)?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("scripts/train.py"));
        assert_eq!(
            lines.collect::<Vec<_>>(),
            trainer_args(&TrainConfig::lcsts_char())
        );
        Ok(())
    }

    #[test]
    fn test_show_json_roundtrip() -> Result<()> {
        let args = ShowArgs {
            json: true,
            ..ShowArgs::default()
        };
        let parsed: TrainConfig = serde_json::from_str(&render(&args)?)?;
        assert_eq!(parsed, TrainConfig::lcsts_char());
        Ok(())
    }
}
