mod catalog;
mod config_gen;
mod setup;
mod terminal;

use std::env;

use story_core::{PlayerConfig, SystemConfig};
use story_script::ScriptGraph;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let list_only = args.iter().any(|a| a == "--list");

    setup::init(!list_only)?;
    log::info!(">>> Story Player Started <<<");

    let sys_cfg: SystemConfig = story_shared::config::get("system");

    if list_only {
        let entries = catalog::scan(&sys_cfg.scripts_dir);
        if entries.is_empty() {
            println!("No scripts found in '{}'", sys_cfg.scripts_dir);
        }
        for entry in entries {
            println!("{}", entry);
        }
        return Ok(());
    }

    let script_path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or(sys_cfg.script_path);
    log::info!("Script: {}", script_path);

    // 坏脚本也能打开，只是显示一段错误文字
    let graph = ScriptGraph::load_or_fallback(&script_path);
    let player_cfg = PlayerConfig::from_shared();

    terminal::run(graph, player_cfg)?;
    log::info!("Bye");
    Ok(())
}
