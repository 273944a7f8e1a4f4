//! Shell Script Export - the launch plan as a standalone `sh` script

use anyhow::{Context, Result};
use clap::Args;
use minijinja::{context, Environment};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::config::TrainConfig;
use crate::flags::{shell_quote, trainer_flags};
use crate::launcher::{LaunchArgs, LaunchPlan};

const TEMPLATE: &str = r#"#!/bin/sh
# Generated by lcsts_launcher. Do not edit; regenerate instead.
cd {{ project_root }} || exit 1
exec {{ program }} {{ script }}{% for line in flags %} \
    {{ line }}{% endfor %}"#;

#[derive(Args, Debug, Clone)]
pub struct ScriptArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Write the script here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Render `plan` as a POSIX shell script, one flag per line.
pub fn render(plan: &LaunchPlan) -> Result<String> {
    let flags: Vec<String> = trainer_flags(plan.config())
        .iter()
        .map(|flag| {
            flag.tokens()
                .iter()
                .map(|t| shell_quote(t))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let script = plan.args().first().map(String::as_str).unwrap_or_default();

    let mut env = Environment::new();
    env.add_template("launch.sh", TEMPLATE)?;
    let tmpl = env.get_template("launch.sh")?;
    let mut out = tmpl.render(context! {
        project_root => shell_quote(&plan.current_dir().to_string_lossy()),
        program => shell_quote(plan.program()),
        script => shell_quote(script),
        flags => flags,
    })?;
    out.push('\n');
    Ok(out)
}

pub fn run(args: ScriptArgs) -> Result<ExitCode> {
    let config = TrainConfig::resolve(args.launch.config.as_deref())?;
    let plan = LaunchPlan::new(config, &args.launch);
    let text = render(&plan)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
            }
            info!("📝 Script written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_builtin() -> Result<()> {
        let plan = LaunchPlan::new(TrainConfig::lcsts_char(), &LaunchArgs::default());
        let text = render(&plan)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "#!/bin/sh");
        assert_eq!(lines[2], "cd .. || exit 1");
        assert_eq!(lines[3], "exec python3 train.py \\");
        assert_eq!(lines[4], "    --model_class pointer_generator \\");
        assert_eq!(lines.last(), Some(&"    --max_epochs 10000"));
        // header + cd + exec + one line per flag
        assert_eq!(lines.len(), 4 + 24);
        assert!(text.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_render_quotes_values() -> Result<()> {
        let mut config = TrainConfig::lcsts_char();
        config.model_dir = PathBuf::from("runs/pg char");
        config.options.use_fp16 = Some(true);
        let plan = LaunchPlan::new(config, &LaunchArgs::default());
        let text = render(&plan)?;

        assert!(text.contains("    --model_dir 'runs/pg char' \\\n"));
        assert!(text.ends_with("    --use_fp16\n"));
        Ok(())
    }
}
